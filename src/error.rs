//! Session-layer error types shared across the store, gateway, and session manager.
//!
//! Raw transport failures are classified into this taxonomy before they reach callers,
//! so UI code never inspects HTTP status codes directly.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical session-layer error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential-storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout); never invalidates the session.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Backend rejected the email/password pair on a credentialing call.
	#[error("Invalid credentials: {reason}")]
	InvalidCredentials {
		/// Backend- or gateway-supplied reason string.
		reason: String,
	},
	/// The account exists but has been deactivated.
	#[error("This account has been deactivated.")]
	AccountDisabled,
	/// Backend signaled too many attempts on a credentialing call.
	#[error("Too many attempts. Please wait before trying again.")]
	RateLimited {
		/// Retry-After hint from the backend, if supplied.
		retry_after: Option<Duration>,
	},
	/// A previously valid session is no longer accepted; forces re-authentication.
	#[error("Your session has expired. Please sign in again.")]
	SessionExpired,
	/// The session is valid but lacks permission for this specific action.
	#[error("Access denied: {reason}")]
	Forbidden {
		/// Backend- or gateway-supplied reason string.
		reason: String,
	},
	/// Backend reported an internal failure; never invalidates the session.
	#[error("The server returned an error (HTTP {status}).")]
	Server {
		/// HTTP status code in the 5xx class.
		status: u16,
	},
	/// Unclassified non-2xx response, passed through to the caller unchanged.
	#[error("Request was rejected (HTTP {status}): {message}")]
	Response {
		/// HTTP status code outside the classified set.
		status: u16,
		/// Body-derived message, or a generic placeholder.
		message: String,
	},
}
impl Error {
	/// Returns a stable label for the error kind, suitable for metric/span fields.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Storage(_) => "storage",
			Self::Config(_) => "config",
			Self::Transport(_) => "transport",
			Self::InvalidCredentials { .. } => "invalid_credentials",
			Self::AccountDisabled => "account_disabled",
			Self::RateLimited { .. } => "rate_limited",
			Self::SessionExpired => "session_expired",
			Self::Forbidden { .. } => "forbidden",
			Self::Server { .. } => "server",
			Self::Response { .. } => "response",
		}
	}

	/// Returns `true` when retrying the same call may succeed without user action.
	pub const fn is_retryable(&self) -> bool {
		matches!(self, Self::Transport(_) | Self::Server { .. } | Self::RateLimited { .. })
	}
}

/// Configuration and validation failures raised by the session layer.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL and path cannot be combined into a request URL.
	#[error("Endpoint path `{path}` is invalid.")]
	InvalidEndpoint {
		/// Offending path fragment.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Response body could not be decoded into the expected shape.
	#[error("Response body could not be decoded.")]
	ResponseDecode {
		/// Structured parsing failure, including the failing JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the offending response.
		status: u16,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	RequestEncode(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure or timeout.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
