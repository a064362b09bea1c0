//! Transport primitives for backend calls.
//!
//! The module exposes [`HttpTransport`] so downstream crates can integrate custom HTTP
//! stacks (or test doubles) without the gateway depending on any concrete client. The
//! built-in [`ReqwestTransport`] applies a fixed request timeout and surfaces
//! `Retry-After` hints so the gateway can classify 429 responses.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{AUTHORIZATION, HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Fixed timeout applied to every backend call; timeouts reject as network-class
/// errors and never touch session state.
pub const REQUEST_TIMEOUT: Duration = Duration::seconds(10);

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// HTTP verbs used by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// Idempotent read.
	Get,
	/// Create or invoke.
	Post,
	/// Full replacement.
	Put,
	/// Removal.
	Delete,
}
impl HttpMethod {
	/// Returns the canonical verb string.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A fully resolved outbound request handed to the transport.
#[derive(Clone, Debug)]
pub struct RawRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Absolute request URL.
	pub url: Url,
	/// Bearer token to attach, when present.
	pub bearer: Option<String>,
	/// JSON body, when present.
	pub body: Option<serde_json::Value>,
}

/// Status, body, and retry hint captured from a backend response.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
	/// Retry-After hint expressed as a relative duration, if supplied.
	pub retry_after: Option<Duration>,
}
impl RawResponse {
	/// Returns `true` for statuses in the 2xx class.
	pub const fn is_success(&self) -> bool {
		self.status >= 200 && self.status < 300
	}
}

/// Abstraction over HTTP stacks capable of executing backend calls.
///
/// The trait is the gateway's only dependency on an HTTP client. Implementations must
/// be `Send + Sync + 'static` so a single transport can be shared across gateways, and
/// the returned futures must be `Send` for the lifetime of the in-flight call.
/// Transport-level failures (DNS, TCP, TLS, timeout) surface as [`TransportError`];
/// non-2xx statuses are *not* transport failures and must be returned as responses.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes a single request, resolving with the raw response.
	fn execute(&self, request: RawRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The built-in constructor applies [`REQUEST_TIMEOUT`]; callers providing their own
/// client via [`ReqwestTransport::with_client`] should configure an equivalent bound so
/// bootstrap can never hang on an unreachable backend.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with the crate's default timeout applied.
	pub fn new() -> Result<Self, ConfigError> {
		let timeout = std::time::Duration::from_secs(REQUEST_TIMEOUT.whole_seconds() as u64);
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: RawRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
				HttpMethod::Put => reqwest::Method::PUT,
				HttpMethod::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url);

			if let Some(bearer) = &request.bearer {
				builder = builder.header(AUTHORIZATION, format!("Bearer {bearer}"));
			}
			if let Some(body) = &request.body {
				builder = builder.json(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(RawResponse { status, body, retry_after })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	// Parsed as i64 so values beyond the representable range fail instead of wrapping;
	// a negative hint is meaningless and dropped.
	if let Ok(secs) = raw.parse::<i64>() {
		return (secs >= 0).then_some(Duration::seconds(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
