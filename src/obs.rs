//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `session_fetch.flow` with the `flow` and
//!   `stage` (call site) fields, plus warnings for swallowed store failures.
//! - Enable `metrics` to increment the `session_fetch_flow_total` counter for every
//!   attempt/success/failure/expiry, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authenticated API request, including its refresh-and-retry cycle.
	Request,
	/// Access token refresh.
	Refresh,
	/// Credential login.
	Login,
	/// Session logout.
	Logout,
	/// Account registration.
	Register,
	/// Password reset request.
	PasswordReset,
	/// Public hello probe.
	Hello,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Request => "request",
			FlowKind::Refresh => "refresh",
			FlowKind::Login => "login",
			FlowKind::Logout => "logout",
			FlowKind::Register => "register",
			FlowKind::PasswordReset => "password_reset",
			FlowKind::Hello => "hello",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Session ended and the login redirect was signaled.
	Expired,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::Expired => "expired",
		}
	}

	/// Classifies a finished operation.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => FlowOutcome::Success,
			Err(Error::SessionExpired) => FlowOutcome::Expired,
			Err(_) => FlowOutcome::Failure,
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
