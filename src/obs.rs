//! Optional observability helpers for flow steps.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_providers.step` with the `step` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `oauth2_providers_step_total` counter for every
//!   attempt/success/failure, labeled by `step` + `outcome`.
//!
//! Credential material never reaches span fields or metric labels.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow steps observed while driving a sign-in attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStep {
	/// Authorization redirect URL construction.
	Authorization,
	/// Authorization-code-for-token exchange.
	Token,
	/// Userinfo retrieval.
	Userinfo,
	/// Profile normalization into the canonical identity record.
	Profile,
}
impl FlowStep {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStep::Authorization => "authorization",
			FlowStep::Token => "token",
			FlowStep::Userinfo => "userinfo",
			FlowStep::Profile => "profile",
		}
	}
}
impl Display for FlowStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
	/// Entry to a flow step helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StepOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepOutcome::Attempt => "attempt",
			StepOutcome::Success => "success",
			StepOutcome::Failure => "failure",
		}
	}
}
impl Display for StepOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
