//! Pure route-access decisions driven by a session snapshot.
//!
//! [`decide`] is deterministic: the same view, required role, and path always produce
//! the same decision. It never touches the clock or any global state—expiry is already
//! folded into the view by the session manager.

// self
use crate::auth::Role;

/// Path navigated to when an authenticated principal lacks the required role.
pub const FALLBACK_PATH: &str = "/dashboard";

/// Session facts consumed by the guard; a value snapshot, never a live handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionView {
	/// Derived authentication flag (user + unexpired credential present).
	pub is_authenticated: bool,
	/// True while the session is still bootstrapping.
	pub is_loading: bool,
	/// Role of the authenticated principal, when one exists.
	pub role: Option<Role>,
}

/// Per-evaluation routing decision; produced fresh on every navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
	/// Render the requested route.
	Allow,
	/// Session state is not settled yet; render a loading indicator.
	Wait,
	/// Send the visitor to the login page, preserving their intended destination.
	RedirectToLogin {
		/// Path to return to after a successful login.
		return_to: String,
	},
	/// Send the authenticated-but-unauthorized visitor to a safe page.
	RedirectToFallback {
		/// Destination path.
		path: String,
	},
}

/// Decides whether the current session may render a route.
pub fn decide(view: SessionView, required_role: Option<Role>, current_path: &str) -> RouteDecision {
	if view.is_loading {
		return RouteDecision::Wait;
	}
	if !view.is_authenticated {
		return RouteDecision::RedirectToLogin { return_to: current_path.to_owned() };
	}
	if let Some(required) = required_role
		&& view.role != Some(required)
	{
		return RouteDecision::RedirectToFallback { path: FALLBACK_PATH.to_owned() };
	}

	RouteDecision::Allow
}
