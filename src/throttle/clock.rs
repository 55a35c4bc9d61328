//! Time sources for throttling and request timestamps.

// self
use crate::_prelude::*;

/// Port for obtaining the current wall-clock time.
pub trait Clock
where
	Self: Send + Sync + Debug,
{
	/// Current instant in UTC.
	fn now(&self) -> OffsetDateTime;
}

/// Clock backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Manually driven clock for deterministic window tests and offline demos.
///
/// Clones share the same instant, so advancing one clone advances all of them.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
impl ManualClock {
	/// Creates a clock pinned at `start`.
	pub fn new(start: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(start)))
	}

	/// Creates a clock pinned at a unix timestamp (seconds); out-of-range values clamp to the
	/// unix epoch.
	pub fn at_unix(seconds: i64) -> Self {
		Self::new(
			OffsetDateTime::from_unix_timestamp(seconds).unwrap_or(OffsetDateTime::UNIX_EPOCH),
		)
	}

	/// Moves the clock forward by `by`.
	pub fn advance(&self, by: Duration) {
		*self.0.lock() += by;
	}

	/// Pins the clock at `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn manual_clock_clones_share_time() {
		let clock = ManualClock::at_unix(1_700_000_000);
		let shared = clock.clone();

		shared.advance(Duration::seconds(5));

		assert_eq!(clock.now().unix_timestamp(), 1_700_000_005);

		clock.set(OffsetDateTime::UNIX_EPOCH);

		assert_eq!(shared.now(), OffsetDateTime::UNIX_EPOCH);
	}
}
