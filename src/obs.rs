//! Optional observability helpers for price-service calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `amp_client.call` with the `endpoint` and
//!   `stage` fields, plus warn events for throttle denials and placeholder secrets.
//! - Enable `metrics` to increment the `amp_client_call_total` counter for every
//!   attempt/success/failure/throttled outcome, labeled by `endpoint` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Denied locally by the throttle window; nothing was sent.
	Throttled,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
			CallOutcome::Throttled => "throttled",
		}
	}

	/// Classifies a finished call.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => CallOutcome::Success,
			Err(Error::RateLimited { .. }) => CallOutcome::Throttled,
			Err(_) => CallOutcome::Failure,
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcome_classification() {
		let denied: Result<()> = Err(Error::RateLimited { reset_at: OffsetDateTime::UNIX_EPOCH });

		assert_eq!(CallOutcome::of(&Ok::<_, Error>(())), CallOutcome::Success);
		assert_eq!(CallOutcome::of(&denied), CallOutcome::Throttled);
		assert_eq!(CallOutcome::of::<()>(&Err(Error::Unauthenticated)), CallOutcome::Failure);
	}
}
