//! Authenticated principal types, mirroring the backend's wire contract.

// self
use crate::_prelude::*;

/// Role of an authenticated principal; the sole gate for admin-only routes.
///
/// The role is authoritative only when it originates from a freshly fetched or freshly
/// authenticated [`Identity`]; it must never be inferred client-side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
	/// Administrative principal with account- and store-management access.
	#[serde(rename = "ADMIN")]
	Admin,
	/// Regular principal limited to assigned stores.
	#[serde(rename = "USER")]
	User,
}
impl Role {
	/// Returns the wire-format label for the role.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Admin => "ADMIN",
			Role::User => "USER",
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Reference to a store assigned to a principal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreAssignment {
	/// Numeric store identifier.
	pub id: i64,
	/// Display name of the store.
	pub name: String,
}

/// The authenticated principal as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
	/// Numeric account identifier.
	pub id: i64,
	/// Unique email address.
	pub email: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Account role.
	pub role: Role,
	/// Whether the account is currently active.
	pub is_active: bool,
	/// Stores assigned to this principal.
	#[serde(default)]
	pub assigned_stores: Vec<StoreAssignment>,
	/// Account creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl Identity {
	/// Returns `true` if the principal carries the administrative role.
	pub const fn is_admin(&self) -> bool {
		matches!(self.role, Role::Admin)
	}
}
