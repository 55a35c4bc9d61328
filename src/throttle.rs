//! Client-side fixed-window throttle shared by every endpoint.
//!
//! A window admits at most `limit` calls. Once the clock reaches the window's reset instant the
//! count drops to zero and a new window of `window` length starts at that moment. Denied calls
//! are reported immediately; nothing is queued or retried.

pub mod clock;

pub use clock::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Calls admitted per window unless configured otherwise.
pub const DEFAULT_LIMIT: u32 = 20;
/// Window length unless configured otherwise.
pub const DEFAULT_WINDOW: Duration = Duration::minutes(5);

/// Raw counter state for the current window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThrottleState {
	/// Calls admitted in the current window.
	pub count: u32,
	/// Instant at which the window rolls over.
	pub reset_at: OffsetDateTime,
}

/// Observation returned by [`ThrottleWindow::status`] and attached to permitted calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleStatus {
	/// Calls still admissible in the current window.
	pub remaining: u32,
	/// Instant at which the window rolls over.
	#[serde(with = "time::serde::rfc3339")]
	pub reset_at: OffsetDateTime,
}

/// Outcome of [`ThrottleWindow::try_acquire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleDecision {
	/// The call may proceed; `status` reflects the slot just consumed.
	Permitted(ThrottleStatus),
	/// The window is exhausted until `reset_at`.
	Denied {
		/// Instant at which the window rolls over.
		reset_at: OffsetDateTime,
	},
}
impl ThrottleDecision {
	/// Whether the call may proceed.
	pub fn is_permitted(&self) -> bool {
		matches!(self, Self::Permitted(_))
	}

	/// Converts a denial into [`Error::RateLimited`].
	pub fn into_result(self) -> Result<ThrottleStatus> {
		match self {
			Self::Permitted(status) => Ok(status),
			Self::Denied { reset_at } => Err(Error::RateLimited { reset_at }),
		}
	}
}

/// Fixed-window limiter with an injectable clock.
///
/// State sits behind a mutex, so one window can be shared through `Arc` by every caller in the
/// process.
pub struct ThrottleWindow {
	clock: Arc<dyn Clock>,
	limit: u32,
	window: Duration,
	state: Mutex<ThrottleState>,
}
impl ThrottleWindow {
	/// Creates a window with the default limit (20) and length (5 minutes).
	pub fn new(clock: Arc<dyn Clock>) -> Self {
		Self::build(clock, DEFAULT_LIMIT, DEFAULT_WINDOW)
	}

	/// Creates a window with a custom limit and length.
	pub fn with_limits(
		clock: Arc<dyn Clock>,
		limit: u32,
		window: Duration,
	) -> Result<Self, ConfigError> {
		if limit == 0 {
			return Err(ConfigError::NonPositive { field: "limit" });
		}
		if !window.is_positive() {
			return Err(ConfigError::NonPositive { field: "window" });
		}

		Ok(Self::build(clock, limit, window))
	}

	fn build(clock: Arc<dyn Clock>, limit: u32, window: Duration) -> Self {
		let reset_at = clock.now() + window;

		Self { clock, limit, window, state: Mutex::new(ThrottleState { count: 0, reset_at }) }
	}

	/// Calls admitted per window.
	pub fn limit(&self) -> u32 {
		self.limit
	}

	/// Window length.
	pub fn window(&self) -> Duration {
		self.window
	}

	/// Attempts to consume one slot from the current window.
	pub fn try_acquire(&self) -> ThrottleDecision {
		let now = self.clock.now();
		let mut state = self.state.lock();

		self.tick(&mut state, now);

		if state.count >= self.limit {
			return ThrottleDecision::Denied { reset_at: state.reset_at };
		}

		state.count += 1;

		ThrottleDecision::Permitted(self.observe(&state))
	}

	/// Reports the remaining budget.
	///
	/// Window rollover is applied first, so a status read after the reset instant starts the
	/// next window; within a live window the count is never touched.
	pub fn status(&self) -> ThrottleStatus {
		let now = self.clock.now();
		let mut state = self.state.lock();

		self.tick(&mut state, now);

		self.observe(&state)
	}

	/// Raw counter state without applying rollover.
	pub fn state(&self) -> ThrottleState {
		*self.state.lock()
	}

	fn tick(&self, state: &mut ThrottleState, now: OffsetDateTime) {
		if now >= state.reset_at {
			state.count = 0;
			state.reset_at = now + self.window;
		}
	}

	fn observe(&self, state: &ThrottleState) -> ThrottleStatus {
		ThrottleStatus { remaining: self.limit.saturating_sub(state.count), reset_at: state.reset_at }
	}
}
impl Debug for ThrottleWindow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ThrottleWindow")
			.field("limit", &self.limit)
			.field("window", &self.window)
			.field("state", &*self.state.lock())
			.finish()
	}
}
