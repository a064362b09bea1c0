// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use session_gate::{
	_preludet::*,
	auth::{Credential, Identity, Role},
	error::TransportError,
	gateway::InvalidationSignal,
	guard::{self, RouteDecision},
	notify::Severity,
	session::{
		AuthBackend, AuthGrant, BackendFuture, RegisterRequest, SessionManager, SessionPhase,
	},
	store::{CredentialStore, MemoryCredentialStore},
};

#[derive(Clone, Copy)]
enum LoginScript {
	Succeed,
	SucceedThenReject,
	RejectCredentials,
	RejectDisabled,
	NetworkDown,
}

struct FakeBackend {
	login_script: LoginScript,
	profile_reachable: bool,
	login_calls: AtomicUsize,
	profile_calls: AtomicUsize,
	end_session_calls: AtomicUsize,
}
impl FakeBackend {
	fn new(login_script: LoginScript, profile_reachable: bool) -> Self {
		Self {
			login_script,
			profile_reachable,
			login_calls: AtomicUsize::new(0),
			profile_calls: AtomicUsize::new(0),
			end_session_calls: AtomicUsize::new(0),
		}
	}

	fn grant(role: Role) -> AuthGrant {
		AuthGrant {
			token: Credential::new(fake_bearer_token(Duration::hours(24))),
			user: test_identity(role),
		}
	}

	fn network_down() -> Error {
		TransportError::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "request timed out"))
			.into()
	}
}
impl AuthBackend for FakeBackend {
	fn login<'a>(&'a self, _email: &'a str, _password: &'a str) -> BackendFuture<'a, AuthGrant> {
		let attempt = self.login_calls.fetch_add(1, Ordering::SeqCst);
		let script = self.login_script;

		Box::pin(async move {
			match script {
				LoginScript::Succeed => Ok(Self::grant(Role::User)),
				LoginScript::SucceedThenReject if attempt == 0 => Ok(Self::grant(Role::User)),
				LoginScript::SucceedThenReject | LoginScript::RejectCredentials =>
					Err(Error::InvalidCredentials { reason: "Invalid email or password.".into() }),
				LoginScript::RejectDisabled => Err(Error::AccountDisabled),
				LoginScript::NetworkDown => Err(Self::network_down()),
			}
		})
	}

	fn register<'a>(&'a self, _request: &'a RegisterRequest) -> BackendFuture<'a, AuthGrant> {
		Box::pin(async move { Ok(Self::grant(Role::User)) })
	}

	fn current_user(&self) -> BackendFuture<'_, Identity> {
		self.profile_calls.fetch_add(1, Ordering::SeqCst);

		let reachable = self.profile_reachable;

		Box::pin(async move {
			if reachable { Ok(test_identity(Role::User)) } else { Err(Self::network_down()) }
		})
	}

	fn end_session<'a>(&'a self, _credential: Option<&'a Credential>) -> BackendFuture<'a, ()> {
		self.end_session_calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Ok(()) })
	}
}

struct Fixture {
	manager: SessionManager,
	store: Arc<MemoryCredentialStore>,
	backend: Arc<FakeBackend>,
	invalidation: Arc<InvalidationSignal>,
	notifier: Arc<RecordingNotifier>,
}

fn build_fixture(login_script: LoginScript, profile_reachable: bool) -> Fixture {
	let store = Arc::new(MemoryCredentialStore::default());
	let backend = Arc::new(FakeBackend::new(login_script, profile_reachable));
	let invalidation = Arc::new(InvalidationSignal::default());
	let notifier = Arc::new(RecordingNotifier::default());
	let manager = SessionManager::new(
		store.clone(),
		backend.clone(),
		invalidation.clone(),
		notifier.clone(),
	);

	Fixture { manager, store, backend, invalidation, notifier }
}

#[tokio::test]
async fn login_success_installs_session_before_resolving() {
	let fixture = build_fixture(LoginScript::Succeed, true);

	fixture
		.manager
		.login("user@test.com", "Secret123")
		.await
		.expect("Login should succeed against the scripted backend.");

	let snapshot = fixture.manager.snapshot();

	assert_eq!(snapshot.phase, SessionPhase::Authenticated);
	assert!(snapshot.is_authenticated());
	assert!(fixture.store.load().is_some(), "Credential should be persisted on success.");
	assert!(fixture.notifier.recorded().is_empty(), "Success must not toast.");

	// A USER-only page is now reachable.
	assert_eq!(
		guard::decide(snapshot.view(), Some(Role::User), "/dashboard"),
		RouteDecision::Allow,
	);
}

#[tokio::test]
async fn login_failure_restores_unauthenticated_and_notifies_once() {
	let fixture = build_fixture(LoginScript::RejectCredentials, true);
	let err = fixture
		.manager
		.login("user@test.com", "wrong")
		.await
		.expect_err("Scripted rejection should surface to the caller.");

	assert!(matches!(err, Error::InvalidCredentials { .. }));

	let snapshot = fixture.manager.snapshot();

	assert_eq!(snapshot.phase, SessionPhase::Unauthenticated);
	assert!(!snapshot.is_authenticated());
	assert!(fixture.store.load().is_none());

	let recorded = fixture.notifier.recorded();

	assert_eq!(recorded.len(), 1, "Exactly one notification per classified login failure.");
	assert_eq!(recorded[0].0, Severity::Error);
}

#[tokio::test]
async fn failed_relogin_clears_the_stored_credential() {
	let fixture = build_fixture(LoginScript::SucceedThenReject, true);

	fixture.manager.login("user@test.com", "Secret123").await.expect("First login should succeed.");

	assert!(fixture.store.load().is_some());

	let err = fixture
		.manager
		.login("user@test.com", "wrong")
		.await
		.expect_err("Second login should be rejected.");

	assert!(matches!(err, Error::InvalidCredentials { .. }));

	let snapshot = fixture.manager.snapshot();

	assert_eq!(snapshot.phase, SessionPhase::Unauthenticated);
	// The store mirrors the reset state; no credential from the old session survives.
	assert!(fixture.store.load().is_none());
}

#[tokio::test]
async fn disabled_account_surfaces_distinct_error() {
	let fixture = build_fixture(LoginScript::RejectDisabled, true);
	let err = fixture
		.manager
		.login("user@test.com", "Secret123")
		.await
		.expect_err("Disabled accounts should be rejected.");

	assert!(matches!(err, Error::AccountDisabled));
	assert_ne!(
		err.to_string(),
		Error::InvalidCredentials { reason: "Invalid email or password.".into() }.to_string(),
	);
}

#[tokio::test]
async fn empty_fields_are_rejected_without_a_backend_call() {
	let fixture = build_fixture(LoginScript::Succeed, true);

	for (email, password) in [("", "Secret123"), ("user@test.com", ""), ("   ", "x")] {
		let err = fixture
			.manager
			.login(email, password)
			.await
			.expect_err("Blank fields should be rejected locally.");

		assert!(matches!(err, Error::InvalidCredentials { .. }));
	}

	assert_eq!(fixture.backend.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn logout_is_idempotent_and_hints_backend_once() {
	let fixture = build_fixture(LoginScript::Succeed, true);

	fixture.manager.login("user@test.com", "Secret123").await.expect("Login should succeed.");
	fixture.manager.logout().await;

	assert!(fixture.store.load().is_none());
	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Unauthenticated);

	// Second logout: still unauthenticated, no error, no second hint.
	fixture.manager.logout().await;

	assert!(fixture.store.load().is_none());
	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Unauthenticated);
	assert_eq!(fixture.backend.end_session_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn logout_clears_locally_before_the_backend_hint_resolves() {
	let fixture = build_fixture(LoginScript::Succeed, true);

	fixture.manager.login("user@test.com", "Secret123").await.expect("Login should succeed.");

	let hint = fixture.manager.logout();

	// Local teardown happened at call time, before the hint future is awaited.
	assert!(fixture.store.load().is_none());
	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Unauthenticated);

	hint.await;
}

#[tokio::test]
async fn bootstrap_without_credential_settles_unauthenticated() {
	let fixture = build_fixture(LoginScript::Succeed, true);

	fixture.manager.bootstrap().await.expect("Bootstrap should always resolve.");

	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Unauthenticated);
	assert_eq!(fixture.backend.profile_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bootstrap_discards_expired_credential_without_a_network_call() {
	let fixture = build_fixture(LoginScript::Succeed, true);

	seed_credential(fixture.store.as_ref(), Duration::hours(-1));
	fixture.manager.bootstrap().await.expect("Bootstrap should always resolve.");

	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Unauthenticated);
	assert!(fixture.store.load().is_none(), "Expired credential should be cleared.");
	assert_eq!(fixture.backend.profile_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bootstrap_confirms_valid_credential_with_the_backend() {
	let fixture = build_fixture(LoginScript::Succeed, true);

	seed_credential(fixture.store.as_ref(), Duration::hours(24));
	fixture.manager.bootstrap().await.expect("Bootstrap should always resolve.");

	let snapshot = fixture.manager.snapshot();

	assert_eq!(snapshot.phase, SessionPhase::Authenticated);
	assert!(snapshot.is_authenticated());
	assert_eq!(fixture.backend.profile_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bootstrap_degrades_safely_when_backend_is_unreachable() {
	let fixture = build_fixture(LoginScript::Succeed, false);

	seed_credential(fixture.store.as_ref(), Duration::hours(24));
	fixture
		.manager
		.bootstrap()
		.await
		.expect("Bootstrap must resolve even with the backend down.");

	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Unauthenticated);
	assert!(fixture.store.load().is_none(), "Unconfirmed credential should be cleared.");
}

#[tokio::test]
async fn externally_signaled_invalidation_resets_the_session() {
	let fixture = build_fixture(LoginScript::Succeed, true);

	fixture.manager.login("user@test.com", "Secret123").await.expect("Login should succeed.");
	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Authenticated);

	// The gateway observes a 401 and trips the shared signal.
	assert!(fixture.invalidation.trip());
	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Unauthenticated);
	assert!(!fixture.manager.snapshot().is_authenticated());

	// A later login re-arms the latch for the next authorization failure.
	fixture.manager.login("user@test.com", "Secret123").await.expect("Login should succeed.");
	assert!(!fixture.invalidation.is_tripped());
}

#[tokio::test]
async fn register_installs_a_session_like_login() {
	let fixture = build_fixture(LoginScript::Succeed, true);
	let request = RegisterRequest {
		email: "new@test.com".into(),
		password: "Secret123".into(),
		first_name: "New".into(),
		last_name: "Person".into(),
	};

	fixture.manager.register(&request).await.expect("Registration should succeed.");

	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Authenticated);
	assert!(fixture.store.load().is_some());
}

#[tokio::test]
async fn network_failure_during_login_is_classified_not_session_affecting() {
	let fixture = build_fixture(LoginScript::NetworkDown, true);
	let err = fixture
		.manager
		.login("user@test.com", "Secret123")
		.await
		.expect_err("Network failure should surface to the caller.");

	assert!(matches!(err, Error::Transport(_)));
	assert!(err.is_retryable());
	assert_eq!(fixture.manager.snapshot().phase, SessionPhase::Unauthenticated);
}
