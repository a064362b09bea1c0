//! Storage contracts and built-in credential store implementations.
//!
//! Stores persist exactly one string value: the raw bearer token. Every operation is
//! synchronous and degrades rather than throws—an unavailable backing medium turns
//! `save`/`clear` into no-ops and `load` into `None`, so the rest of the session layer
//! keeps functioning for the duration of a single page session.

pub mod file;
pub mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

// self
use crate::{_prelude::*, auth::Credential};

/// Persistence contract for the session credential.
///
/// Implementations own the credential exclusively; the session manager only holds a
/// transient copy surfaced to callers. `clear` must be idempotent.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the credential. Failures degrade to a no-op.
	fn save(&self, credential: &Credential);

	/// Returns the persisted credential, or `None` when absent or unreadable.
	fn load(&self) -> Option<Credential>;

	/// Removes the persisted credential. Clearing an empty store is a no-op.
	fn clear(&self);
}

/// Error type produced by store construction and internal persistence paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failure surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage medium.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
