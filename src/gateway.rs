//! Authorized request gateway: bearer attachment, response classification, and the
//! centralized session-invalidation trigger.
//!
//! Every backend call flows through [`RequestGateway::dispatch`]. The gateway attaches
//! the stored credential as a bearer header, classifies non-2xx responses into the
//! crate error taxonomy, and—on a 401 from an authenticated call—clears the store and
//! trips the shared [`InvalidationSignal`] so concurrent failures collapse to a single
//! state transition and a single user-facing notification.

pub mod invalidation;
pub mod transport;

pub use invalidation::InvalidationSignal;
#[cfg(feature = "reqwest")] pub use transport::ReqwestTransport;
pub use transport::{
	HttpMethod, HttpTransport, REQUEST_TIMEOUT, RawRequest, RawResponse, TransportFuture,
};

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::Credential,
	error::ConfigError,
	notify::{Notifier, Severity},
	store::CredentialStore,
};

/// Notification shown once per transition into the unauthenticated state via a 401.
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please sign in again.";
/// Notification shown when an authenticated call is rejected with 403.
pub const ACCESS_DENIED_NOTICE: &str = "You do not have permission to perform this action.";
/// Notification shown when an authenticated call receives a 5xx response.
pub const SERVER_ERROR_NOTICE: &str = "The server encountered an error. Please try again later.";
/// Notification shown when an authenticated call receives no response at all.
pub const NETWORK_ERROR_NOTICE: &str = "Network error. Please check your connection and retry.";

/// Authorization treatment for a single call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
	/// Regular call made inside a session; a 401 invalidates the session.
	Authenticated,
	/// Credential-issuing call (login/register); a 401 means the attempt failed and the
	/// session, if any, is left untouched.
	Credentialing,
}

/// A single outbound backend call prior to URL resolution and bearer attachment.
#[derive(Clone, Debug)]
pub struct ApiCall {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Path joined against the gateway's base URL.
	pub path: String,
	/// JSON body, when present.
	pub body: Option<serde_json::Value>,
	/// Authorization treatment.
	pub kind: CallKind,
	bearer: Option<Credential>,
}
impl ApiCall {
	/// Creates an authenticated call for the provided verb + path.
	pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), body: None, kind: CallKind::Authenticated, bearer: None }
	}

	/// Creates an authenticated GET call.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(HttpMethod::Get, path)
	}

	/// Creates an authenticated POST call.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(HttpMethod::Post, path)
	}

	/// Marks the call as credential-issuing (login/register semantics).
	pub fn credentialing(mut self) -> Self {
		self.kind = CallKind::Credentialing;

		self
	}

	/// Attaches a serializable JSON body.
	pub fn with_json(mut self, body: &impl Serialize) -> Result<Self, ConfigError> {
		self.body = Some(serde_json::to_value(body)?);

		Ok(self)
	}

	/// Overrides the bearer credential for this call only, bypassing the store lookup.
	/// Used by logout to hint the backend after the local credential is already gone.
	pub fn with_bearer(mut self, credential: Credential) -> Self {
		self.bearer = Some(credential);

		self
	}
}

/// Coordinates all outbound backend calls for one session.
///
/// The gateway owns the transport, base URL, credential store, invalidation signal,
/// and notification sink so callers only deal with paths and classified errors.
pub struct RequestGateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport executing every outbound call.
	pub transport: Arc<T>,
	/// Base URL all call paths are joined against.
	pub base: Url,
	store: Arc<dyn CredentialStore>,
	invalidation: Arc<InvalidationSignal>,
	notifier: Arc<dyn Notifier>,
}
impl<T> RequestGateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a gateway over the provided transport and collaborators.
	pub fn new(
		transport: impl Into<Arc<T>>,
		base: Url,
		store: Arc<dyn CredentialStore>,
		invalidation: Arc<InvalidationSignal>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		Self { transport: transport.into(), base, store, invalidation, notifier }
	}

	/// Returns the shared credential store.
	pub fn store(&self) -> Arc<dyn CredentialStore> {
		self.store.clone()
	}

	/// Returns the shared invalidation signal.
	pub fn invalidation(&self) -> Arc<InvalidationSignal> {
		self.invalidation.clone()
	}

	/// Returns the shared notification sink.
	pub fn notifier(&self) -> Arc<dyn Notifier> {
		self.notifier.clone()
	}

	/// Executes a call, attaching the stored credential and classifying any failure.
	pub async fn dispatch(&self, call: ApiCall) -> Result<RawResponse> {
		let url = self.endpoint(&call.path)?;
		let bearer =
			call.bearer.or_else(|| self.store.load()).map(|c| c.expose().to_owned());
		let request = RawRequest { method: call.method, url, bearer, body: call.body };
		let response = match self.transport.execute(request).await {
			Ok(response) => response,
			Err(e) => {
				// Credentialing failures surface once via the session manager; toasting
				// here as well would double-notify the same error.
				if call.kind == CallKind::Authenticated {
					self.notifier.notify(Severity::Error, NETWORK_ERROR_NOTICE);
				}

				return Err(e.into());
			},
		};

		if response.is_success() {
			return Ok(response);
		}

		Err(self.classify_failure(call.kind, &response))
	}

	/// Executes a call and decodes the 2xx body as JSON, reporting the failing path on
	/// malformed payloads.
	pub async fn dispatch_json<D>(&self, call: ApiCall) -> Result<D>
	where
		D: DeserializeOwned,
	{
		let response = self.dispatch(call).await?;

		decode_json(&response)
	}

	/// Convenience authenticated GET returning decoded JSON.
	pub async fn get_json<D>(&self, path: &str) -> Result<D>
	where
		D: DeserializeOwned,
	{
		self.dispatch_json(ApiCall::get(path)).await
	}

	/// Convenience authenticated POST returning decoded JSON.
	pub async fn post_json<D>(&self, path: &str, body: &impl Serialize) -> Result<D>
	where
		D: DeserializeOwned,
	{
		self.dispatch_json(ApiCall::post(path).with_json(body)?).await
	}

	fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		self.base
			.join(path)
			.map_err(|source| ConfigError::InvalidEndpoint { path: path.to_owned(), source })
	}

	fn classify_failure(&self, kind: CallKind, response: &RawResponse) -> Error {
		match (kind, response.status) {
			(CallKind::Credentialing, 401) => Error::InvalidCredentials {
				reason: error_message(&response.body)
					.unwrap_or_else(|| "Invalid email or password.".into()),
			},
			(CallKind::Credentialing, 403) => Error::AccountDisabled,
			(CallKind::Credentialing, 429) =>
				Error::RateLimited { retry_after: response.retry_after },
			(CallKind::Authenticated, 401) => {
				self.store.clear();

				if self.invalidation.trip() {
					self.notifier.notify(Severity::Warning, SESSION_EXPIRED_NOTICE);
				}

				Error::SessionExpired
			},
			(CallKind::Authenticated, 403) => {
				self.notifier.notify(Severity::Error, ACCESS_DENIED_NOTICE);

				Error::Forbidden {
					reason: error_message(&response.body)
						.unwrap_or_else(|| "Access denied.".into()),
				}
			},
			(kind, status) if status >= 500 => {
				if kind == CallKind::Authenticated {
					self.notifier.notify(Severity::Error, SERVER_ERROR_NOTICE);
				}

				Error::Server { status }
			},
			(_, status) => Error::Response {
				status,
				message: error_message(&response.body)
					.unwrap_or_else(|| "Request was rejected.".into()),
			},
		}
	}
}
impl<T> Clone for RequestGateway<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			base: self.base.clone(),
			store: self.store.clone(),
			invalidation: self.invalidation.clone(),
			notifier: self.notifier.clone(),
		}
	}
}
impl<T> Debug for RequestGateway<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestGateway")
			.field("base", &self.base.as_str())
			.field("invalidation", &self.invalidation)
			.finish()
	}
}

/// Decodes a 2xx response body, mapping malformed JSON to [`ConfigError::ResponseDecode`].
pub fn decode_json<D>(response: &RawResponse) -> Result<D>
where
	D: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ConfigError::ResponseDecode { source, status: response.status }.into())
}

fn error_message(body: &[u8]) -> Option<String> {
	#[derive(Deserialize)]
	struct ErrorBody {
		message: Option<String>,
		error: Option<String>,
	}

	let parsed: ErrorBody = serde_json::from_slice(body).ok()?;

	parsed.message.or(parsed.error).filter(|message| !message.trim().is_empty())
}
