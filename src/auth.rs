//! Credential and identity domain types shared across the session layer.

pub mod credential;
pub mod identity;

pub use credential::Credential;
pub use identity::{Identity, Role, StoreAssignment};
