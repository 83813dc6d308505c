// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

/// Counter incremented once per recorded outcome, labeled by `flow` and `outcome`.
pub const FLOW_COUNTER: &str = "session_fetch_flow_total";

/// Bumps [`FLOW_COUNTER`] for `kind`/`outcome`. Compiles to nothing without the `metrics`
/// feature.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records the terminal outcome of a finished operation; a [`Error::SessionExpired`] counts as
/// `expired` rather than `failure`.
pub fn record_flow_result<T>(kind: FlowKind, result: &Result<T>) {
	record_flow_outcome(kind, FlowOutcome::of(result));
}
