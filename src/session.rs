//! Session state machine: the single source of truth for "who is logged in."
//!
//! [`SessionManager`] is the only component permitted to transition session state.
//! It cycles between `Unauthenticated` and `Authenticated` for the lifetime of the
//! process, starting in `Bootstrapping` until [`SessionManager::bootstrap`] settles.
//! Transitions apply in the order their triggering operations resolve—concurrent
//! logins are not serialized, and there is no cancel-in-flight mechanism; callers
//! needing stronger ordering must serialize calls themselves.

pub mod backend;

pub use backend::{
	AuthBackend, AuthGrant, BackendFuture, LOGIN_PATH, LOGOUT_PATH, ME_PATH, REGISTER_PATH,
	RegisterRequest, RestAuthBackend,
};

// self
use crate::{
	_prelude::*,
	auth::{Credential, Identity, Role},
	gateway::InvalidationSignal,
	guard::SessionView,
	notify::{Notifier, Severity},
	obs::{self, SessionFlow},
	store::CredentialStore,
};

/// Lifecycle phase of the session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
	/// Startup credential validation has not settled yet.
	Bootstrapping,
	/// No valid session exists.
	Unauthenticated,
	/// A login call is in flight.
	Authenticating,
	/// A user and an unexpired credential are installed.
	Authenticated,
}

/// Point-in-time copy of the session state handed to the UI and the route guard.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
	/// Current lifecycle phase.
	pub phase: SessionPhase,
	/// Authenticated principal, when one exists.
	pub user: Option<Identity>,
	/// Transient copy of the stored credential, when one exists.
	pub credential: Option<Credential>,
}
impl SessionSnapshot {
	/// Derived authentication flag: true iff both user and credential are present and
	/// the credential is unexpired. Never stored independently.
	pub fn is_authenticated(&self) -> bool {
		self.user.is_some() && self.credential.as_ref().is_some_and(|c| !c.is_expired())
	}

	/// True while startup validation has not settled.
	pub const fn is_loading(&self) -> bool {
		matches!(self.phase, SessionPhase::Bootstrapping)
	}

	/// Role of the authenticated principal, when one exists.
	pub fn role(&self) -> Option<Role> {
		self.user.as_ref().map(|user| user.role)
	}

	/// Projects the snapshot into the guard's input shape.
	pub fn view(&self) -> SessionView {
		SessionView {
			is_authenticated: self.is_authenticated(),
			is_loading: self.is_loading(),
			role: self.role(),
		}
	}
}

#[derive(Debug)]
struct SessionState {
	phase: SessionPhase,
	user: Option<Identity>,
	credential: Option<Credential>,
}
impl SessionState {
	const fn initial() -> Self {
		Self { phase: SessionPhase::Bootstrapping, user: None, credential: None }
	}

	fn reset(&mut self) {
		self.phase = SessionPhase::Unauthenticated;
		self.user = None;
		self.credential = None;
	}
}

/// Owns and transitions the session state.
///
/// Collaborators are injected explicitly so tests can substitute fakes for the store
/// and backend without touching global state.
pub struct SessionManager {
	store: Arc<dyn CredentialStore>,
	backend: Arc<dyn AuthBackend>,
	notifier: Arc<dyn Notifier>,
	invalidation: Arc<InvalidationSignal>,
	state: Arc<RwLock<SessionState>>,
}
impl SessionManager {
	/// Creates a manager and subscribes it to the invalidation signal, so a 401
	/// observed by the gateway resets this session without further wiring.
	pub fn new(
		store: Arc<dyn CredentialStore>,
		backend: Arc<dyn AuthBackend>,
		invalidation: Arc<InvalidationSignal>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		let state = Arc::new(RwLock::new(SessionState::initial()));
		let observed = state.clone();

		invalidation.subscribe(move || {
			observed.write().reset();
		});

		Self { store, backend, notifier, invalidation, state }
	}

	/// Returns a point-in-time copy of the session state.
	pub fn snapshot(&self) -> SessionSnapshot {
		let guard = self.state.read();

		SessionSnapshot {
			phase: guard.phase,
			user: guard.user.clone(),
			credential: guard.credential.clone(),
		}
	}

	/// Exchanges an email/password pair for a session.
	///
	/// On success the store and state reflect the new user and credential before the
	/// future resolves. On failure the store is cleared and the state restored to
	/// `Unauthenticated`, one user-facing notification fires, and the classified error
	/// is returned for inline display by the login form.
	pub async fn login(&self, email: &str, password: &str) -> Result<()> {
		obs::observe_flow(SessionFlow::Login, async move {
			if email.trim().is_empty() || password.is_empty() {
				return self.fail_credentialing(Error::InvalidCredentials {
					reason: "Email and password are required.".into(),
				});
			}

			self.state.write().phase = SessionPhase::Authenticating;

			match self.backend.login(email, password).await {
				Ok(grant) => {
					self.install(grant);

					Ok(())
				},
				Err(e) => self.fail_credentialing(e),
			}
		})
		.await
	}

	/// Creates an account and installs the resulting session; same contract as
	/// [`SessionManager::login`].
	pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
		obs::observe_flow(SessionFlow::Register, async move {
			self.state.write().phase = SessionPhase::Authenticating;

			match self.backend.register(request).await {
				Ok(grant) => {
					self.install(grant);

					Ok(())
				},
				Err(e) => self.fail_credentialing(e),
			}
		})
		.await
	}

	/// Tears the session down locally, then returns a future driving the best-effort
	/// backend hint.
	///
	/// The store and state are already cleared when this method returns; awaiting the
	/// future only notifies the backend and never fails. Calling logout on an empty
	/// session is a no-op.
	pub fn logout(&self) -> impl Future<Output = ()> + '_ {
		let credential = obs::observe_local(SessionFlow::Logout, || {
			let credential = self.store.load();

			self.store.clear();
			self.state.write().reset();

			credential
		});
		let backend = self.backend.clone();

		async move {
			if let Some(credential) = credential {
				let _ = backend.end_session(Some(&credential)).await;
			}
		}
	}

	/// Validates any persisted credential at application start.
	///
	/// Resolves in every case: no stored credential, an expired one, or an unreachable
	/// backend all degrade to `Unauthenticated` (clearing the store) instead of
	/// hanging or failing. A valid credential becomes an authenticated session only
	/// after the backend confirms it by returning the current user.
	pub async fn bootstrap(&self) -> Result<()> {
		obs::observe_flow(SessionFlow::Bootstrap, async move {
			let Some(credential) = self.store.load() else {
				self.state.write().reset();

				return Ok(());
			};

			if credential.is_expired() {
				self.store.clear();
				self.state.write().reset();

				return Ok(());
			}

			match self.backend.current_user().await {
				Ok(user) => {
					{
						let mut guard = self.state.write();

						guard.phase = SessionPhase::Authenticated;
						guard.user = Some(user);
						guard.credential = Some(credential);
					}

					self.invalidation.rearm();

					Ok(())
				},
				Err(_) => {
					self.store.clear();
					self.state.write().reset();

					Ok(())
				},
			}
		})
		.await
	}

	fn install(&self, grant: AuthGrant) {
		self.store.save(&grant.token);

		{
			let mut guard = self.state.write();

			guard.phase = SessionPhase::Authenticated;
			guard.user = Some(grant.user);
			guard.credential = Some(grant.token);
		}

		self.invalidation.rearm();
	}

	fn fail_credentialing(&self, error: Error) -> Result<()> {
		// The store must mirror the reset state; a previously installed session does
		// not survive a failed re-login.
		self.store.clear();
		self.state.write().reset();
		self.notifier.notify(Severity::Error, &error.to_string());

		Err(error)
	}
}
impl Debug for SessionManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let guard = self.state.read();

		f.debug_struct("SessionManager")
			.field("phase", &guard.phase)
			.field("user", &guard.user.as_ref().map(|user| user.email.as_str()))
			.field("credential_set", &guard.credential.is_some())
			.finish()
	}
}
