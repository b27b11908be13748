//! Bearer credential primitives.
//!
//! # Design
//! - The credential is opaque to the pipeline; it is only ever echoed back as a bearer header.
//! - Structured (three-segment) tokens may be decoded for a subject and expiry, but the
//!   result is a hint: identity is confirmed by the backend, never by the payload.
//! - Signatures are not verified client-side.

use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Opaque bearer credential identifying an authenticated session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw credential, rejecting empty or whitespace-only input.
    ///
    /// Accepted input is kept byte for byte.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    /// Raw credential value for transport.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Credential(<redacted>)")
    }
}

/// Non-authoritative data read from a structured credential's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHint {
    /// `sub` claim; the account email for StudyLink tokens.
    pub subject: Option<String>,
    /// `exp` claim converted to a timestamp.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A structured credential whose payload could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HintError {
    /// The payload segment is not base64url.
    #[error("credential payload is not base64url")]
    Encoding,
    /// The payload decoded but is not a JSON claims object.
    #[error("credential payload is not a claims object")]
    Payload,
    /// The `exp` claim is outside the representable range.
    #[error("credential expiry is out of range")]
    Expiry,
}

#[derive(Deserialize)]
struct RawClaims {
    sub: Option<String>,
    exp: Option<i64>,
}

impl TokenHint {
    /// Decode the payload of a three-segment token.
    ///
    /// Returns `Ok(None)` for credentials that are not structured tokens; those
    /// carry no local expiry and are confirmed by the backend alone.
    ///
    /// # Errors
    ///
    /// Returns a [`HintError`] when the token looks structured but its payload is unreadable.
    pub fn decode(credential: &Credential) -> Result<Option<Self>, HintError> {
        let segments: Vec<&str> = credential.expose().split('.').collect();
        let [_, payload, _] = segments.as_slice() else {
            return Ok(None);
        };
        let bytes = general_purpose::URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| HintError::Encoding)?;
        let claims: RawClaims = serde_json::from_slice(&bytes).map_err(|_| HintError::Payload)?;
        let expires_at = match claims.exp {
            Some(exp) => Some(DateTime::from_timestamp(exp, 0).ok_or(HintError::Expiry)?),
            None => None,
        };
        Ok(Some(Self {
            subject: claims.sub,
            expires_at,
        }))
    }

    /// Whether the expiry claim is at or before `now`. Tokens without `exp` never expire locally.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    pub(crate) fn structured_token(claims: &serde_json::Value) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn credential_requires_non_empty() {
        assert!(Credential::new(String::new()).is_none());
        assert!(Credential::new("   ").is_none());
        let credential = Credential::new(" tok-123 ");
        assert_eq!(credential.as_ref().map(Credential::expose), Some(" tok-123 "));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::new("secret-token");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn opaque_credentials_have_no_hint() {
        let credential = Credential::new("tok-123");
        let hint = credential.as_ref().map(TokenHint::decode);
        assert_eq!(hint, Some(Ok(None)));
    }

    #[test]
    fn structured_credentials_expose_subject_and_expiry() {
        let now = Utc::now();
        let exp = (now + Duration::hours(1)).timestamp();
        let token = structured_token(&serde_json::json!({"sub": "ann@example.com", "exp": exp}));
        let Some(credential) = Credential::new(token) else {
            panic!("non-empty token");
        };
        let Ok(Some(hint)) = TokenHint::decode(&credential) else {
            panic!("structured token should decode");
        };
        assert_eq!(hint.subject.as_deref(), Some("ann@example.com"));
        assert!(!hint.is_expired(now));
        assert!(hint.is_expired(now + Duration::hours(2)));
    }

    #[test]
    fn unreadable_payloads_are_malformed() {
        let bad_encoding = Credential::new("a.!!!.c");
        assert_eq!(
            bad_encoding.as_ref().map(TokenHint::decode),
            Some(Err(HintError::Encoding))
        );

        let not_json = general_purpose::URL_SAFE_NO_PAD.encode("plain");
        let bad_payload = Credential::new(format!("a.{not_json}.c"));
        assert_eq!(
            bad_payload.as_ref().map(TokenHint::decode),
            Some(Err(HintError::Payload))
        );
    }

    #[test]
    fn missing_expiry_never_expires_locally() {
        let token = structured_token(&serde_json::json!({"sub": "bo@example.com"}));
        let hint = Credential::new(token)
            .as_ref()
            .map(TokenHint::decode)
            .and_then(Result::ok)
            .flatten();
        assert!(hint.is_some_and(|hint| !hint.is_expired(Utc::now())));
    }
}
