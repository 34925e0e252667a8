//! Optional observability helpers for token acquisition and API calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `zoom_api.call` with the `op` (operation)
//!   and `stage` (call site) fields, and to route debug-mode diagnostics to the
//!   `zoom_api::debug` target.
//! - Enable `metrics` to increment the `zoom_api_call_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`, and `zoom_api_token_cache_total`
//!   for every cache lookup, labeled by `result`.

mod debug;
mod metrics;
mod tracing;

pub use debug::*;
pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// OAuth `account_credentials` token acquisition.
	OAuthToken,
	/// Legacy JWT signing.
	LegacySign,
	/// Authenticated REST API request.
	ApiRequest,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::OAuthToken => "oauth_token",
			CallKind::LegacySign => "legacy_sign",
			CallKind::ApiRequest => "api_request",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}

	/// Maps a finished result onto its outcome label.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { CallOutcome::Success } else { CallOutcome::Failure }
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a [`CallSpan`], counting the attempt and its outcome.
pub async fn observe<T, Fut>(kind: CallKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(kind, stage);

	record_call_outcome(kind, CallOutcome::Attempt);

	let result = span.instrument(fut).await;

	settle(&span, kind, &result);

	result
}

/// Synchronous counterpart of [`observe`].
pub fn observe_sync<T>(
	kind: CallKind,
	stage: &'static str,
	f: impl FnOnce() -> Result<T>,
) -> Result<T> {
	let span = CallSpan::new(kind, stage);

	record_call_outcome(kind, CallOutcome::Attempt);

	let result = span.in_scope(f);

	settle(&span, kind, &result);

	result
}

fn settle<T>(span: &CallSpan, kind: CallKind, result: &Result<T>) {
	let outcome = CallOutcome::of(result);

	span.finish(outcome);
	record_call_outcome(kind, outcome);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn observe_sync_passes_results_through() {
		let ok = observe_sync(CallKind::LegacySign, "test", || Ok(5_u8));
		let err = observe_sync::<u8>(CallKind::LegacySign, "test", || {
			Err(Error::status(500, None))
		});

		assert_eq!(ok.ok(), Some(5));
		assert!(matches!(err, Err(Error::Status { status: 500, .. })));
	}

	#[tokio::test]
	async fn observe_passes_results_through() {
		let value = observe(CallKind::ApiRequest, "test", async { Ok("done") })
			.await
			.expect("Successful future should pass through.");

		assert_eq!(value, "done");
	}

	#[test]
	fn outcome_follows_result() {
		let ok: Result<u8, ()> = Ok(1);
		let err: Result<u8, ()> = Err(());

		assert_eq!(CallOutcome::of(&ok), CallOutcome::Success);
		assert_eq!(CallOutcome::of(&err).as_str(), "failure");
		assert_eq!(CallKind::OAuthToken.to_string(), "oauth_token");
	}
}
