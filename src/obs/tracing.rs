// self
use crate::{
	_prelude::*,
	obs::{CallKind, CallOutcome},
};

/// Future returned by [`CallSpan::instrument`]; the future itself when tracing is disabled.
#[cfg(feature = "tracing")]
pub type Traced<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]; the future itself when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type Traced<F> = F;

/// `zoom_api.call` span covering one client operation.
///
/// The `outcome` field starts empty and is filled by [`CallSpan::finish`].
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span for `kind` at call site `stage`.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"zoom_api.call",
				op = kind.as_str(),
				stage,
				outcome = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs a synchronous section inside the span.
	pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Attaches the span to `fut` so it is entered on every poll.
	pub fn instrument<Fut>(&self, fut: Fut) -> Traced<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Records the final outcome on the span.
	pub fn finish(&self, outcome: CallOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = outcome;
		}
	}
}

/// Logs a token cache lookup inside the current span.
pub fn trace_cache_lookup(hit: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(hit, "token cache lookup");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = hit;
	}
}
