//! Error types for the store, the request pipeline, and the session controller.

use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for request pipeline operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result alias for session controller operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Failures raised by a [`crate::TokenStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("token store {operation} failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// File the operation targeted.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The persisted document could not be serialised.
    #[error("failed to encode token store document")]
    Encode {
        /// Source serde error.
        source: serde_json::Error,
    },
    /// The persisted document exists but is not valid JSON.
    #[error("token store document is corrupt")]
    Decode {
        /// File that failed to parse.
        path: PathBuf,
        /// Source serde error.
        source: serde_json::Error,
    },
}

/// Failures raised by the request pipeline.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Building the underlying HTTP client failed.
    #[error("failed to build HTTP client")]
    ClientBuild {
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// The request path could not be joined onto the base URL.
    #[error("invalid request path '{path}'")]
    InvalidPath {
        /// Offending path.
        path: String,
        /// Source URL parse error.
        source: url::ParseError,
    },
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request to {path} failed")]
    Transport {
        /// Request path.
        path: String,
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// The backend rejected the credential (HTTP 401).
    #[error("request to {path} was not authorized")]
    Unauthorized {
        /// Request path.
        path: String,
    },
    /// Any other non-success response.
    #[error("request to {path} failed with status {status}: {message}")]
    Rejected {
        /// Request path.
        path: String,
        /// Response status code.
        status: StatusCode,
        /// Message extracted from the response body.
        message: String,
    },
    /// A success response carried a body that did not match the expected shape.
    #[error("response from {path} could not be decoded")]
    Decode {
        /// Request path.
        path: String,
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// The session changed while the request was in flight; the response was discarded.
    #[error("response from {path} arrived after the session changed")]
    Stale {
        /// Request path.
        path: String,
    },
}

impl ApiError {
    /// Status code carried by the failure, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the payload itself (400, 409, 422).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY)
        )
    }

    /// Whether this is the 401 class handled globally by the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Failures raised by the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `login` was called while a session is already established.
    #[error("a session is already authenticated")]
    AlreadyAuthenticated,
    /// The credential is empty or its structured payload is unreadable.
    #[error("credential is malformed")]
    MalformedCredential,
    /// The login endpoint refused the supplied email/password.
    #[error("email or password was rejected")]
    InvalidCredentials {
        /// Underlying pipeline failure.
        source: ApiError,
    },
    /// Identity could not be confirmed with the backend.
    #[error("could not verify session")]
    ClaimsUnavailable {
        /// Underlying pipeline failure.
        source: ApiError,
    },
    /// A logout or forced sign-out happened while this flow was in flight.
    #[error("session changed before the operation completed")]
    Superseded,
    /// The credential could not be persisted.
    #[error("credential could not be persisted")]
    Store {
        /// Underlying store failure.
        source: StoreError,
    },
    /// Any other pipeline failure surfaced by a session-level call.
    #[error("session request failed")]
    Api {
        /// Underlying pipeline failure.
        source: ApiError,
    },
}

/// Invalid client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL could not be parsed or cannot carry paths.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl {
        /// Value supplied by the caller.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A zero timeout would fail every request.
    #[error("request timeout must be positive")]
    InvalidTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_classifies_statuses() {
        let unauthorized = ApiError::Unauthorized {
            path: "/api/members/me".into(),
        };
        assert!(unauthorized.is_unauthorized());
        assert_eq!(unauthorized.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(!unauthorized.is_validation());

        let conflict = ApiError::Rejected {
            path: "/api/auth/signup".into(),
            status: StatusCode::CONFLICT,
            message: "email taken".into(),
        };
        assert!(conflict.is_validation());
        assert_eq!(
            conflict.to_string(),
            "request to /api/auth/signup failed with status 409 Conflict: email taken"
        );

        let server = ApiError::Rejected {
            path: "/api/study-groups".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::new(),
        };
        assert!(!server.is_validation());
        assert!(
            ApiError::Stale {
                path: "/x".into()
            }
            .status()
            .is_none()
        );
    }

    #[test]
    fn session_error_messages_are_user_facing() {
        assert_eq!(
            SessionError::ClaimsUnavailable {
                source: ApiError::Unauthorized { path: "/".into() }
            }
            .to_string(),
            "could not verify session"
        );
        assert_eq!(
            ConfigError::InvalidBaseUrl {
                value: "nope".into(),
                reason: "unparseable"
            }
            .to_string(),
            "invalid base URL 'nope': unparseable"
        );
    }
}
