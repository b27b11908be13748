//! Authenticated HTTP pipeline (REST).
//!
//! # Design
//! - Every request reads the token store just before sending and attaches the
//!   credential as a bearer header; public endpoints simply go out without one.
//! - A 401 is reported through [`AuthEvents`] and then returned to the caller,
//!   so page-local error handling still runs. The pipeline never clears storage
//!   or navigates itself; the session owns those transitions.
//! - Responses to credentialed requests that land after the session epoch moved
//!   are discarded as [`ApiError::Stale`]. Epoch and credential are read together
//!   under the transition lock the session commits under.
//! - Endpoint paths are resolved below the base URL, so a base with a path
//!   prefix (`https://host/studylink/`) keeps it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::epoch::SessionEpoch;
use crate::error::{ApiError, ApiResult};
use crate::events::{AuthEvent, AuthEvents};
use crate::store::TokenStore;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// Shared HTTP client for the StudyLink backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    store: Arc<dyn TokenStore>,
    epoch: SessionEpoch,
    events: AuthEvents,
    transition: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        if let Some(request_id) = config
            .request_id
            .as_deref()
            .and_then(|value| HeaderValue::from_str(value).ok())
        {
            default_headers.insert(HEADER_REQUEST_ID, request_id);
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;
        Ok(Self::with_client(http, config.base_url.clone(), store))
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub fn with_client(http: Client, base_url: Url, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url: with_trailing_slash(base_url),
            store,
            epoch: SessionEpoch::new(),
            events: AuthEvents::new(),
            transition: Arc::new(Mutex::new(())),
        }
    }

    /// Backend origin requests are joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Credential store consulted before every request.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Session generation shared with the controller.
    #[must_use]
    pub const fn epoch(&self) -> &SessionEpoch {
        &self.epoch
    }

    /// Event hub that receives 401 notifications.
    #[must_use]
    pub const fn events(&self) -> &AuthEvents {
        &self.events
    }

    /// Lock serialising credential transitions with request snapshots.
    pub(crate) fn lock_transition(&self) -> MutexGuard<'_, ()> {
        self.transition
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a request for `path` relative to the base URL.
    ///
    /// A leading `/` on `path` is ignored; the base URL's own path is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPath`] if the path cannot be joined.
    pub fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ApiError::InvalidPath {
                path: path.to_string(),
                source,
            })?;
        Ok(self.http.request(method, url))
    }

    /// Send a request through the pre-send and post-receive hooks.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for transport failures, 401s, other non-success
    /// statuses, and stale responses.
    pub async fn send(&self, path: &str, request: RequestBuilder) -> ApiResult<Response> {
        let (epoch, credential) = {
            let _guard = self.lock_transition();
            (self.epoch.current(), self.current_credential())
        };
        let request = match &credential {
            Some(credential) => request.bearer_auth(credential.expose()),
            None => request,
        };

        let response = request.send().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        self.inspect(path, epoch, credential.is_some(), response)
            .await
    }

    /// `GET` a JSON document.
    ///
    /// # Errors
    ///
    /// See [`Self::send`]; also returns [`ApiError::Decode`] for unexpected bodies.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let request = self.request(Method::GET, path)?;
        let response = self.send(path, request).await?;
        decode_json(path, response).await
    }

    /// `GET` a JSON document with query parameters.
    ///
    /// # Errors
    ///
    /// See [`Self::get_json`].
    pub async fn get_json_query<Q, T>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path)?.query(query);
        let response = self.send(path, request).await?;
        decode_json(path, response).await
    }

    /// `POST` a JSON body and decode a JSON response.
    ///
    /// # Errors
    ///
    /// See [`Self::get_json`].
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path)?.json(body);
        let response = self.send(path, request).await?;
        decode_json(path, response).await
    }

    /// `PUT` a JSON body and decode a JSON response.
    ///
    /// # Errors
    ///
    /// See [`Self::get_json`].
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path)?.json(body);
        let response = self.send(path, request).await?;
        decode_json(path, response).await
    }

    /// `POST` a JSON body and return the plain-text confirmation.
    ///
    /// # Errors
    ///
    /// See [`Self::get_json`].
    pub async fn post_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<String> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send_text(path, request).await
    }

    /// `PUT` a JSON body and return the plain-text confirmation.
    ///
    /// # Errors
    ///
    /// See [`Self::get_json`].
    pub async fn put_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<String> {
        let request = self.request(Method::PUT, path)?.json(body);
        self.send_text(path, request).await
    }

    /// `DELETE` a resource and return the plain-text confirmation.
    ///
    /// # Errors
    ///
    /// See [`Self::get_json`].
    pub async fn delete_text(&self, path: &str) -> ApiResult<String> {
        let request = self.request(Method::DELETE, path)?;
        self.send_text(path, request).await
    }

    async fn send_text(&self, path: &str, request: RequestBuilder) -> ApiResult<String> {
        let response = self.send(path, request).await?;
        response.text().await.map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    fn current_credential(&self) -> Option<Credential> {
        match self.store.read() {
            Ok(credential) => credential,
            Err(err) => {
                error!(error = %err, "token store read failed; sending unauthenticated");
                None
            }
        }
    }

    async fn inspect(
        &self,
        path: &str,
        epoch: u64,
        credentialed: bool,
        response: Response,
    ) -> ApiResult<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(path, epoch, "request rejected with 401");
            self.events.emit(&AuthEvent::Unauthorized {
                epoch,
                path: path.to_string(),
            });
            return Err(ApiError::Unauthorized {
                path: path.to_string(),
            });
        }

        if !status.is_success() {
            let message = extract_message(response).await;
            debug!(path, %status, "request rejected");
            return Err(ApiError::Rejected {
                path: path.to_string(),
                status,
                message,
            });
        }

        if credentialed && self.epoch.current() != epoch {
            debug!(path, epoch, "discarding response from a previous session");
            return Err(ApiError::Stale {
                path: path.to_string(),
            });
        }
        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("epoch", &self.epoch.current())
            .finish_non_exhaustive()
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn decode_json<T: DeserializeOwned>(path: &str, response: Response) -> ApiResult<T> {
    response.json::<T>().await.map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers with plain text, a JSON string, or a JSON object with a
/// `message` or `error` field depending on where the failure originated.
async fn extract_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(text)) => text,
        Ok(value) => value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| trimmed.to_string(), str::to_string),
        Err(_) => trimmed.to_string(),
    }
}
