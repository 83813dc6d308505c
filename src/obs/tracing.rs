// self
use crate::{_prelude::*, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("session_fetch.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
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
}

/// Logs an error that the client deliberately swallows (e.g. a failed logout call).
pub fn record_swallowed_error(kind: FlowKind, stage: &'static str, err: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(flow = kind.as_str(), stage, error = %err, "ignoring failure");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, stage, err);
	}
}

/// Logs a step of the refresh-and-retry cycle at debug level.
pub fn record_step(kind: FlowKind, step: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(flow = kind.as_str(), step);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, step);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn helpers_are_noops_without_subscriber() {
		let err = std::io::Error::other("disk full");

		record_swallowed_error(FlowKind::Logout, "remove_tokens", &err);
		record_step(FlowKind::Request, "unauthorized");
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(FlowKind::Refresh, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
