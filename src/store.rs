//! Persistence contracts and built-in backends for the per-install device identifier.

pub mod file;
pub mod memory;

pub use file::FileDeviceStore;
pub use memory::MemoryDeviceStore;

// self
use crate::{_prelude::*, auth::DeviceId};

/// Storage backend contract for the device identifier.
///
/// Implementations must return the same identifier from [`load`](DeviceStore::load) for the
/// lifetime of an install once [`save`](DeviceStore::save) succeeded.
pub trait DeviceStore
where
	Self: Send + Sync,
{
	/// Fetches the persisted identifier, if any.
	fn load(&self) -> Result<Option<DeviceId>, StoreError>;

	/// Persists or replaces the identifier.
	fn save(&self, device_id: &DeviceId) -> Result<(), StoreError>;
}

/// Error type produced by [`DeviceStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
