//! In-memory [`DeviceStore`] for tests and ephemeral installs.

// self
use crate::{
	_prelude::*,
	auth::DeviceId,
	store::{DeviceStore, StoreError},
};

/// Thread-safe backend that keeps the identifier in-process; it is lost on restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryDeviceStore(Arc<RwLock<Option<DeviceId>>>);
impl MemoryDeviceStore {
	/// Creates a store pre-seeded with `device_id`.
	pub fn with_device(device_id: DeviceId) -> Self {
		Self(Arc::new(RwLock::new(Some(device_id))))
	}
}
impl DeviceStore for MemoryDeviceStore {
	fn load(&self) -> Result<Option<DeviceId>, StoreError> {
		Ok(self.0.read().clone())
	}

	fn save(&self, device_id: &DeviceId) -> Result<(), StoreError> {
		*self.0.write() = Some(device_id.clone());

		Ok(())
	}
}
