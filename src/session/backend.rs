//! Authentication backend contract and its REST implementation over the gateway.

// self
use crate::{
	_prelude::*,
	auth::{Credential, Identity},
	gateway::{ApiCall, HttpTransport, RequestGateway},
};

/// Backend endpoint issuing credentials from an email/password pair.
pub const LOGIN_PATH: &str = "/auth/login";
/// Backend endpoint creating an account and issuing credentials.
pub const REGISTER_PATH: &str = "/auth/register";
/// Backend endpoint returning the authenticated principal.
pub const ME_PATH: &str = "/auth/me";
/// Backend endpoint receiving the best-effort logout hint.
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Boxed future returned by [`AuthBackend`] operations.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// External collaborator issuing and validating credentials.
///
/// Implementations classify failures into the crate error taxonomy before rejecting;
/// the session manager never inspects transport-level status codes.
pub trait AuthBackend
where
	Self: Send + Sync,
{
	/// Exchanges an email/password pair for a credential and identity.
	fn login<'a>(&'a self, email: &'a str, password: &'a str) -> BackendFuture<'a, AuthGrant>;

	/// Creates an account and returns its first credential and identity.
	fn register<'a>(&'a self, request: &'a RegisterRequest) -> BackendFuture<'a, AuthGrant>;

	/// Fetches the principal owning the stored credential.
	fn current_user(&self) -> BackendFuture<'_, Identity>;

	/// Best-effort server-side session teardown. Callers ignore the outcome.
	fn end_session<'a>(&'a self, credential: Option<&'a Credential>) -> BackendFuture<'a, ()>;
}

/// Credential + identity pair issued by login and registration.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthGrant {
	/// Freshly issued bearer credential.
	pub token: Credential,
	/// Principal the credential belongs to.
	pub user: Identity,
}

/// Account-creation payload for [`AuthBackend::register`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
	/// Unique email address.
	pub email: String,
	/// Plain-text password, forwarded to the backend over TLS.
	pub password: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
	email: &'a str,
	password: &'a str,
}

/// [`AuthBackend`] implementation over the crate's REST contract.
#[derive(Clone, Debug)]
pub struct RestAuthBackend<T>
where
	T: ?Sized + HttpTransport,
{
	gateway: RequestGateway<T>,
}
impl<T> RestAuthBackend<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps a gateway; the backend shares the gateway's store, signal, and notifier.
	pub fn new(gateway: RequestGateway<T>) -> Self {
		Self { gateway }
	}
}
impl<T> AuthBackend for RestAuthBackend<T>
where
	T: ?Sized + HttpTransport,
{
	fn login<'a>(&'a self, email: &'a str, password: &'a str) -> BackendFuture<'a, AuthGrant> {
		Box::pin(async move {
			let call = ApiCall::post(LOGIN_PATH)
				.credentialing()
				.with_json(&LoginRequest { email, password })?;

			self.gateway.dispatch_json(call).await
		})
	}

	fn register<'a>(&'a self, request: &'a RegisterRequest) -> BackendFuture<'a, AuthGrant> {
		Box::pin(async move {
			let call = ApiCall::post(REGISTER_PATH).credentialing().with_json(request)?;

			self.gateway.dispatch_json(call).await
		})
	}

	fn current_user(&self) -> BackendFuture<'_, Identity> {
		Box::pin(async move { self.gateway.get_json(ME_PATH).await })
	}

	fn end_session<'a>(&'a self, credential: Option<&'a Credential>) -> BackendFuture<'a, ()> {
		Box::pin(async move {
			// Credentialing treatment: a stale token here must not re-trip invalidation
			// or toast while the local session is already torn down.
			let mut call = ApiCall::post(LOGOUT_PATH).credentialing();

			if let Some(credential) = credential {
				call = call.with_bearer(credential.clone());
			}

			self.gateway.dispatch(call).await.map(|_| ())
		})
	}
}
