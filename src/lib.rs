//! Client-side session and authorization layer—bearer credential storage, a
//! login/logout/bootstrap state machine, a 401-aware request gateway, and pure
//! route-guard decisions in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod notify;
pub mod obs;
pub mod session;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use crate::{
		auth::{Credential, Identity, Role, StoreAssignment},
		gateway::{InvalidationSignal, RequestGateway},
		notify::{Notifier, Severity},
		store::{CredentialStore, MemoryCredentialStore},
	};
	#[cfg(feature = "reqwest")] use crate::gateway::ReqwestTransport;

	/// Notifier that records every `(severity, message)` pair for later assertions.
	#[derive(Debug, Default)]
	pub struct RecordingNotifier(Mutex<Vec<(Severity, String)>>);
	impl RecordingNotifier {
		/// Returns a snapshot of the recorded notifications.
		pub fn recorded(&self) -> Vec<(Severity, String)> {
			self.0.lock().clone()
		}
	}
	impl Notifier for RecordingNotifier {
		fn notify(&self, severity: Severity, message: &str) {
			self.0.lock().push((severity, message.to_owned()));
		}
	}

	/// Fabricates an unsigned three-segment bearer token whose payload carries an `exp`
	/// claim offset from the current clock.
	pub fn fake_bearer_token(expires_in: Duration) -> String {
		let exp = (OffsetDateTime::now_utc() + expires_in).unix_timestamp();

		fake_bearer_token_with_payload(&serde_json::json!({ "exp": exp }))
	}

	/// Fabricates an unsigned three-segment bearer token from an arbitrary payload document.
	pub fn fake_bearer_token_with_payload(payload: &serde_json::Value) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
		let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());

		format!("{header}.{body}.sig")
	}

	/// Identity fixture matching the backend's wire shape.
	pub fn test_identity(role: Role) -> Identity {
		Identity {
			id: 7,
			email: "user@test.com".into(),
			first_name: "Test".into(),
			last_name: "User".into(),
			role,
			is_active: true,
			assigned_stores: vec![StoreAssignment { id: 1, name: "Downtown".into() }],
			created_at: time::macros::datetime!(2025-01-01 00:00 UTC),
		}
	}

	/// Seeds the provided store with a credential that expires after `expires_in`.
	pub fn seed_credential(store: &dyn CredentialStore, expires_in: Duration) -> Credential {
		let credential = Credential::new(fake_bearer_token(expires_in));

		store.save(&credential);

		credential
	}

	#[cfg(feature = "reqwest")]
	/// Gateway fixture wired to an in-memory store, a fresh invalidation signal, and a
	/// recording notifier, pointed at the provided base URL (typically an `httpmock` server).
	pub fn build_reqwest_test_gateway(
		base_url: &str,
	) -> (
		RequestGateway<ReqwestTransport>,
		Arc<MemoryCredentialStore>,
		Arc<InvalidationSignal>,
		Arc<RecordingNotifier>,
	) {
		let store_backend = Arc::new(MemoryCredentialStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let invalidation = Arc::new(InvalidationSignal::default());
		let notifier = Arc::new(RecordingNotifier::default());
		let base = Url::parse(base_url).expect("Test base URL should parse successfully.");
		let transport =
			ReqwestTransport::new().expect("Reqwest transport should build successfully.");
		let gateway = RequestGateway::new(
			transport,
			base,
			store,
			invalidation.clone(),
			notifier.clone() as Arc<dyn Notifier>,
		);

		(gateway, store_backend, invalidation, notifier)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use session_gate as _;
#[cfg(all(test, feature = "reqwest"))] use {httpmock as _, tokio as _};
