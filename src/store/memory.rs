//! Thread-safe in-memory [`CredentialStore`] for tests and single-session runtimes.

// self
use crate::{_prelude::*, auth::Credential, store::CredentialStore};

/// Keeps the credential in-process; contents vanish when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore(RwLock<Option<Credential>>);
impl CredentialStore for MemoryCredentialStore {
	fn save(&self, credential: &Credential) {
		*self.0.write() = Some(credential.clone());
	}

	fn load(&self) -> Option<Credential> {
		self.0.read().clone()
	}

	fn clear(&self) {
		*self.0.write() = None;
	}
}
