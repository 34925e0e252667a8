//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::CachedToken,
	store::{CacheKey, StoreError, StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<CacheKey, CachedToken>>>;

/// Process-lifetime token cache. Growth is bounded by the number of distinct credential
/// identities a process uses.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of entries currently held, expired ones included.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing has been cached yet.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Raw entry for `key`, ignoring expiry. Intended for inspection in tests and tooling.
	pub fn peek(&self, key: &CacheKey) -> Option<CachedToken> {
		self.0.read().get(key).cloned()
	}

	fn get_now(map: StoreMap, key: &CacheKey, now: OffsetDateTime) -> Option<CachedToken> {
		map.read().get(key).filter(|token| !token.is_expired_at(now)).cloned()
	}

	fn set_now(map: StoreMap, key: CacheKey, token: CachedToken) -> Result<(), StoreError> {
		map.write().insert(key, token);

		Ok(())
	}
}
impl TokenStore for MemoryStore {
	fn get<'a>(
		&'a self,
		key: &'a CacheKey,
		now: OffsetDateTime,
	) -> StoreFuture<'a, Option<CachedToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::get_now(map, key, now)) })
	}

	fn set(&self, key: CacheKey, token: CachedToken) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::set_now(map, key, token) })
	}
}
