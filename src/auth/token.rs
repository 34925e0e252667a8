//! Cached bearer tokens and their expiry checks.

// self
use crate::{_prelude::*, auth::Secret};

/// Bearer token together with the instant after which it must not be served.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
	/// Access token; callers must avoid logging it.
	pub token: Secret,
	/// Cache expiry, already reduced by the safety margin.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Creates an entry that expires `ttl` after `now`. Negative TTLs clamp to zero.
	///
	/// Returns `None` when `now + ttl` falls outside the representable date range.
	pub fn new(token: impl Into<Secret>, now: OffsetDateTime, ttl: Duration) -> Option<Self> {
		let ttl = if ttl.is_negative() { Duration::ZERO } else { ttl };

		Some(Self { token: token.into(), expires_at: now.checked_add(ttl)? })
	}

	/// Returns `true` if the entry must no longer be served at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Remaining lifetime at `instant`, zero once expired.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		if self.is_expired_at(instant) { Duration::ZERO } else { self.expires_at - instant }
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn expiry_boundary_is_exclusive() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let token = CachedToken::new("abc", now, Duration::seconds(3300))
			.expect("Fixture expiry should be representable.");

		assert!(!token.is_expired_at(now + Duration::seconds(3299)));
		assert!(token.is_expired_at(now + Duration::seconds(3300)));
		assert_eq!(token.remaining_at(now + Duration::seconds(3000)), Duration::seconds(300));
		assert_eq!(token.remaining_at(now + Duration::hours(2)), Duration::ZERO);
	}

	#[test]
	fn negative_ttl_clamps_to_now() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let token = CachedToken::new("abc", now, Duration::seconds(-10))
			.expect("Fixture expiry should be representable.");

		assert_eq!(token.expires_at, now);
		assert!(token.is_expired_at(now));
	}

	#[test]
	fn unrepresentable_expiry_is_rejected() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);

		assert!(CachedToken::new("abc", now, Duration::seconds(9_000_000_000_000)).is_none());
	}
}
