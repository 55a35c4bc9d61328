//! Application + device identity pair carried by every signed request.

// self
use crate::{
	_prelude::*,
	auth::{AppId, DeviceId},
	store::DeviceStore,
};

/// Identity bound into request signatures.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
	/// Static application identifier.
	pub app_id: AppId,
	/// Per-install device identifier.
	pub device_id: DeviceId,
}
impl Identity {
	/// Creates an identity from explicit parts.
	pub fn new(app_id: AppId, device_id: DeviceId) -> Self {
		Self { app_id, device_id }
	}

	/// Loads the persisted device identifier from `store`, generating and saving a new one on
	/// first run.
	pub fn resolve(app_id: AppId, store: &dyn DeviceStore) -> Result<Self> {
		if let Some(device_id) = store.load()? {
			return Ok(Self::new(app_id, device_id));
		}

		let device_id = DeviceId::generate();

		store.save(&device_id)?;

		Ok(Self::new(app_id, device_id))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::MemoryDeviceStore;

	#[test]
	fn resolve_generates_once_then_reuses() {
		let store = MemoryDeviceStore::default();
		let app = AppId::new("ppmt-amp-ios-v1").expect("App fixture should be valid.");
		let first = Identity::resolve(app.clone(), &store).expect("First resolve should succeed.");
		let second = Identity::resolve(app, &store).expect("Second resolve should succeed.");

		assert_eq!(first, second);
		assert_eq!(
			store.load().expect("Store load should succeed."),
			Some(first.device_id.clone())
		);
	}

	#[test]
	fn resolve_prefers_stored_device() {
		let stored = DeviceId::new("dev-stored").expect("Device fixture should be valid.");
		let store = MemoryDeviceStore::with_device(stored.clone());
		let identity = Identity::resolve(
			AppId::new("app-1").expect("App fixture should be valid."),
			&store,
		)
		.expect("Resolve should succeed.");

		assert_eq!(identity.device_id, stored);
	}
}
