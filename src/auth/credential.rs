//! Redacted bearer credential wrapper with expiry introspection.
//!
//! The credential is opaque to this layer except for its `exp` claim, read from the
//! base64url-decoded middle segment of a three-part dot-delimited token. Expiry
//! checking fails closed: a token whose expiry cannot be determined is treated as
//! expired, never as valid.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

/// Bearer credential wrapper keeping the raw token out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);
impl Credential {
	/// Wraps a raw bearer token string. No structural validation happens here; expiry
	/// introspection copes with arbitrary content.
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	/// Returns the raw token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Decodes the embedded `exp` claim, if the token carries a parseable one.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		let mut segments = self.0.split('.');
		let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
			(Some(_), Some(payload), Some(_), None) => payload,
			_ => return None,
		};
		let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
		let claims: Claims = serde_json::from_slice(&bytes).ok()?;
		let exp = claims.exp?;

		OffsetDateTime::from_unix_timestamp(exp).ok()
	}

	/// Returns `true` if the credential is expired at the provided instant.
	///
	/// Fails closed: when no expiry can be decoded the credential reports expired, so
	/// malformed tokens are never treated as valid.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		match self.expires_at() {
			Some(expires_at) => instant >= expires_at,
			None => true,
		}
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl AsRef<str> for Credential {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Credential").field(&"<redacted>").finish()
	}
}
impl Display for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[derive(Deserialize)]
struct Claims {
	exp: Option<i64>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::{fake_bearer_token, fake_bearer_token_with_payload};

	#[test]
	fn formatters_redact() {
		let credential = Credential::new("header.payload.signature");

		assert_eq!(format!("{credential:?}"), "Credential(\"<redacted>\")");
		assert_eq!(format!("{credential}"), "<redacted>");
	}

	#[test]
	fn expiry_reads_exp_claim() {
		let credential = Credential::new(fake_bearer_token(Duration::hours(24)));
		let expires_at =
			credential.expires_at().expect("Fabricated token should expose an expiry instant.");

		assert!(expires_at > OffsetDateTime::now_utc());
		assert!(!credential.is_expired());
	}

	#[test]
	fn past_exp_claim_is_expired_without_network() {
		let credential = Credential::new(fake_bearer_token(Duration::hours(-1)));

		assert!(credential.is_expired());
	}

	#[test]
	fn expiry_is_monotonic() {
		let credential = Credential::new(fake_bearer_token(Duration::minutes(10)));
		let expires_at =
			credential.expires_at().expect("Fabricated token should expose an expiry instant.");

		assert!(credential.is_expired_at(expires_at));
		assert!(credential.is_expired_at(expires_at + Duration::seconds(1)));
		assert!(credential.is_expired_at(expires_at + Duration::days(365)));
		assert!(!credential.is_expired_at(expires_at - Duration::seconds(1)));
	}

	#[test]
	fn malformed_tokens_fail_closed() {
		for raw in ["", "no-dots", "one.dot", "a.b.c.d", "a.!!!not-base64!!!.c"] {
			let credential = Credential::new(raw);

			assert!(credential.expires_at().is_none(), "`{raw}` must not decode an expiry.");
			assert!(credential.is_expired(), "`{raw}` must be treated as expired.");
		}
	}

	#[test]
	fn missing_exp_claim_fails_closed() {
		let credential = Credential::new(fake_bearer_token_with_payload(&serde_json::json!({
			"sub": "user-7"
		})));

		assert!(credential.expires_at().is_none());
		assert!(credential.is_expired());
	}

	#[test]
	fn non_numeric_exp_claim_fails_closed() {
		let credential = Credential::new(fake_bearer_token_with_payload(&serde_json::json!({
			"exp": "tomorrow"
		})));

		assert!(credential.is_expired());
	}
}
