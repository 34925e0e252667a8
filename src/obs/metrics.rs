// self
use crate::obs::{CallKind, CallOutcome};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"zoom_api_call_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records whether a token cache lookup was served from the cache.
pub fn record_cache_lookup(hit: bool) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"zoom_api_token_cache_total",
			"result" => if hit { "hit" } else { "miss" }
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = hit;
	}
}
