//! Simple file-backed [`CredentialStore`] for desktop shells and CLI sessions.
//!
//! The file holds the raw bearer token and nothing else. Mutations write through an
//! in-memory mirror and persist with a tmp-file + rename so a crash never leaves a
//! partially written token behind. Persistence failures after `open` degrade to
//! in-memory-only operation, per the store contract.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	obs,
	store::{CredentialStore, StoreError},
};

/// Persists the credential to a single file after each mutation.
#[derive(Debug)]
pub struct FileCredentialStore {
	path: PathBuf,
	inner: RwLock<Option<Credential>>,
}
impl FileCredentialStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing content.
	///
	/// Unreadable or empty content loads as `None` rather than failing; only an
	/// inaccessible parent directory is reported as an error.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path);

		Ok(Self { path, inner: RwLock::new(snapshot) })
	}

	fn load_snapshot(path: &Path) -> Option<Credential> {
		if !path.exists() {
			return None;
		}

		let raw = fs::read_to_string(path).ok()?;
		let trimmed = raw.trim();

		if trimmed.is_empty() {
			return None;
		}

		Some(Credential::new(trimmed))
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist(&self, raw: &str) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(raw.as_bytes()).map_err(|e| StoreError::Backend {
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

	fn remove(&self) -> Result<(), StoreError> {
		if !self.path.exists() {
			return Ok(());
		}

		fs::remove_file(&self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to remove {}: {e}", self.path.display()),
		})
	}
}
impl CredentialStore for FileCredentialStore {
	fn save(&self, credential: &Credential) {
		*self.inner.write() = Some(credential.clone());

		if let Err(e) = self.persist(credential.expose()) {
			obs::record_store_fault("save", &e);
		}
	}

	fn load(&self) -> Option<Credential> {
		self.inner.read().clone()
	}

	fn clear(&self) {
		*self.inner.write() = None;

		if let Err(e) = self.remove() {
			obs::record_store_fault("clear", &e);
		}
	}
}
