//! Client configuration resolved by the composition root.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";
/// Per-request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const TOKEN_DIR: &str = ".studylink";
const TOKEN_FILE: &str = "session.json";

/// Settings needed to build an [`crate::ApiClient`] and its token store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin; request paths are joined onto it.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Where the file token store keeps the credential.
    pub token_path: PathBuf,
    /// Value of the `x-request-id` header attached to every request.
    pub request_id: Option<String>,
}

impl ClientConfig {
    /// Pair a backend origin with default settings.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            token_path: default_token_path(),
            request_id: None,
        }
    }

    /// Parse a base URL and pair it with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the value is not an absolute
    /// http(s) URL.
    pub fn with_base_url(value: &str) -> Result<Self, ConfigError> {
        parse_base_url(value).map(Self::new)
    }

    /// Check invariants that field edits after construction may have broken.
    ///
    /// # Errors
    ///
    /// Returns an error when the timeout is zero or the base URL cannot carry paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                value: self.base_url.to_string(),
                reason: "cannot be a base",
            });
        }
        Ok(())
    }
}

/// Parse and normalise a backend origin.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] for unparseable or non-http(s) values.
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|_| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason: "unparseable",
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            value: value.to_string(),
            reason: "scheme must be http or https",
        });
    }
    Ok(url)
}

/// `$HOME/.studylink/session.json`, or a relative path when `HOME` is unset.
#[must_use]
pub fn default_token_path() -> PathBuf {
    env::var_os("HOME")
        .map_or_else(|| PathBuf::from(TOKEN_DIR), |home| PathBuf::from(home).join(TOKEN_DIR))
        .join(TOKEN_FILE)
}
