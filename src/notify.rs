//! User-facing notification sink contract.
//!
//! The session layer emits `(severity, message)` pairs; rendering and queueing belong
//! to the host application. Every classified error produces at most one notification.

// self
use crate::_prelude::*;

/// Severity attached to a user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
	/// Neutral information.
	Info,
	/// Positive confirmation.
	Success,
	/// Recoverable problem requiring user attention.
	Warning,
	/// Failure of the attempted action.
	Error,
}
impl Severity {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Severity::Info => "info",
			Severity::Success => "success",
			Severity::Warning => "warning",
			Severity::Error => "error",
		}
	}
}
impl Display for Severity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Sink for user-facing notifications, implemented by the host UI.
pub trait Notifier
where
	Self: Send + Sync,
{
	/// Surfaces a single notification to the user.
	fn notify(&self, severity: Severity, message: &str);
}

/// No-op sink for headless use and tests that do not assert on notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;
impl Notifier for NullNotifier {
	fn notify(&self, _severity: Severity, _message: &str) {}
}
