//! JSON file-backed [`DeviceStore`] so the device identifier survives restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::DeviceId,
	store::{DeviceStore, StoreError},
};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceSnapshot {
	device_id: DeviceId,
	#[serde(with = "time::serde::rfc3339")]
	created_at: OffsetDateTime,
}

/// Persists the device identifier to a JSON file, replacing it atomically on save.
#[derive(Clone, Debug)]
pub struct FileDeviceStore {
	path: PathBuf,
	inner: Arc<RwLock<Option<DeviceId>>>,
}
impl FileDeviceStore {
	/// Opens (or prepares) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Option<DeviceId>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let snapshot: DeviceSnapshot =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(Some(snapshot.device_id))
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist(&self, device_id: &DeviceId) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let snapshot =
			DeviceSnapshot { device_id: device_id.clone(), created_at: OffsetDateTime::now_utc() };
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize device snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl DeviceStore for FileDeviceStore {
	fn load(&self) -> Result<Option<DeviceId>, StoreError> {
		Ok(self.inner.read().clone())
	}

	fn save(&self, device_id: &DeviceId) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		self.persist(device_id)?;
		*guard = Some(device_id.clone());

		Ok(())
	}
}
