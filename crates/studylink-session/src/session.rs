//! Session controller: the single source of truth for who is signed in.
//!
//! # Design
//! - State lives in a `watch` channel; observers treat `Uninitialized` as a real state.
//! - Every commit happens under the pipeline's transition lock and only if the
//!   epoch the flow started from is still current, so a late result cannot
//!   resurrect a session that was logged out meanwhile. The pipeline takes the
//!   same lock to snapshot epoch and credential, so a request never pairs a new
//!   epoch with a credential that is about to be cleared. The lock is never
//!   held across an await.
//! - 401s arrive as [`AuthEvent::Unauthorized`]; the first one for the current
//!   epoch advances it and owns the clear and the redirect.

use std::sync::{Arc, MutexGuard, Weak};

use reqwest::StatusCode;
use studylink_api_models::{EntityId, LoginRequest, SignupRequest, UserProfile};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::credential::{Credential, TokenHint};
use crate::error::{ApiError, SessionError, SessionResult, StoreError};
use crate::events::{AuthEvent, AuthListener};
use crate::navigation::{Navigator, Route};
use crate::pipeline::ApiClient;

/// Identity confirmed by the backend's profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Member identifier.
    pub id: EntityId,
    /// Display name.
    pub nickname: String,
    /// Login email.
    pub email: String,
}

impl From<UserProfile> for IdentityClaims {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            nickname: profile.nickname,
            email: profile.email,
        }
    }
}

/// Observable session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Startup reconciliation has not settled yet.
    #[default]
    Uninitialized,
    /// A credential is stored and the backend confirmed who it belongs to.
    Authenticated(IdentityClaims),
    /// No usable credential.
    Unauthenticated,
}

impl SessionState {
    /// Claims of the signed-in member, if any.
    #[must_use]
    pub const fn claims(&self) -> Option<&IdentityClaims> {
        match self {
            Self::Authenticated(claims) => Some(claims),
            _ => None,
        }
    }

    /// Whether a member is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Authenticated(_) => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

/// Explicitly constructed session controller shared by everything that needs it.
pub struct Session {
    api: ApiClient,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Controller using the system clock.
    #[must_use]
    pub fn new(api: ApiClient, navigator: Arc<dyn Navigator>) -> Arc<Self> {
        Self::with_clock(api, navigator, Arc::new(SystemClock))
    }

    /// Controller with an explicit clock for expiry checks.
    ///
    /// The controller subscribes itself to the pipeline's 401 notifications.
    #[must_use]
    pub fn with_clock(
        api: ApiClient,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        let session = Arc::new(Self {
            api,
            navigator,
            clock,
            state,
        });
        let weak = Arc::downgrade(&session);
        let listener: Weak<dyn AuthListener> = weak;
        session.api.events().subscribe(listener);
        session
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Pipeline this session authenticates.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Reconcile with the token store on startup.
    ///
    /// Never touches the network when nothing is stored. Expired or unreadable
    /// credentials are cleared; any failure to confirm identity degrades to
    /// `Unauthenticated` and leaves redirection to the route guard.
    pub async fn initialize(&self) -> SessionState {
        let epoch = self.api.epoch().current();
        let Some(credential) = self.stored_credential() else {
            self.commit(epoch, SessionState::Unauthenticated, false);
            return self.state();
        };

        let expired = match TokenHint::decode(&credential) {
            Ok(Some(hint)) => hint.is_expired(self.clock.now()),
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "stored credential is malformed");
                true
            }
        };
        if expired {
            info!("stored credential expired; clearing");
            if self.commit(epoch, SessionState::Unauthenticated, true) {
                self.api.events().emit(&AuthEvent::Expired);
            }
            return self.state();
        }

        match self.api.my_profile().await {
            Ok(profile) => {
                let claims = IdentityClaims::from(profile);
                debug!(user_id = claims.id, "session restored");
                self.commit(epoch, SessionState::Authenticated(claims), false);
            }
            Err(err) => {
                warn!(error = %err, "could not verify stored session");
                self.commit(epoch, SessionState::Unauthenticated, true);
            }
        }
        self.state()
    }

    /// Establish a session from a bearer credential.
    ///
    /// Persists the credential, confirms identity with the backend, then
    /// navigates home.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyAuthenticated`] when a session is active.
    /// - [`SessionError::MalformedCredential`] for blank or unreadable credentials.
    /// - [`SessionError::Store`] when the credential cannot be persisted.
    /// - [`SessionError::ClaimsUnavailable`] when identity cannot be confirmed;
    ///   the store is cleared and the state is `Unauthenticated`.
    /// - [`SessionError::Superseded`] when a logout happened during the fetch.
    pub async fn login(&self, raw: &str) -> SessionResult<IdentityClaims> {
        let credential = Credential::new(raw).ok_or(SessionError::MalformedCredential)?;
        if TokenHint::decode(&credential).is_err() {
            return Err(SessionError::MalformedCredential);
        }

        let epoch = {
            let _guard = self.lock();
            if self.state.borrow().is_authenticated() {
                return Err(SessionError::AlreadyAuthenticated);
            }
            let epoch = self.api.epoch().advance();
            if let Err(source) = self.api.store().save(&credential) {
                error!(error = %source, "failed to persist credential");
                self.state.send_replace(SessionState::Unauthenticated);
                return Err(SessionError::Store { source });
            }
            epoch
        };

        match self.api.my_profile().await {
            Ok(profile) => {
                let claims = IdentityClaims::from(profile);
                if !self.commit(epoch, SessionState::Authenticated(claims.clone()), false) {
                    return Err(SessionError::Superseded);
                }
                info!(user_id = claims.id, "signed in");
                self.navigator.navigate(Route::Home);
                self.api
                    .events()
                    .emit(&AuthEvent::LoggedIn { user_id: claims.id });
                Ok(claims)
            }
            Err(ApiError::Stale { .. }) => Err(SessionError::Superseded),
            Err(source) => {
                warn!(error = %source, "identity fetch after login failed");
                self.commit(epoch, SessionState::Unauthenticated, true);
                Err(SessionError::ClaimsUnavailable { source })
            }
        }
    }

    /// Exchange email and password for a credential, then [`Self::login`].
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidCredentials`] when the login endpoint refuses the
    /// pair, [`SessionError::Api`] for other endpoint failures, otherwise as
    /// [`Self::login`].
    pub async fn sign_in(&self, request: &LoginRequest) -> SessionResult<IdentityClaims> {
        if self.state.borrow().is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated);
        }
        let response = self.api.login(request).await.map_err(|source| {
            if matches!(
                source.status(),
                Some(StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST)
            ) {
                SessionError::InvalidCredentials { source }
            } else {
                SessionError::Api { source }
            }
        })?;
        self.login(&response.access_token).await
    }

    /// Register a member, then send them to the login view.
    ///
    /// Session state is unchanged.
    ///
    /// # Errors
    ///
    /// [`SessionError::Api`] when the signup endpoint rejects the request.
    pub async fn sign_up(&self, request: &SignupRequest) -> SessionResult<String> {
        let confirmation = self
            .api
            .signup(request)
            .await
            .map_err(|source| SessionError::Api { source })?;
        self.navigator.navigate(Route::Login);
        Ok(confirmation)
    }

    /// End the session. Safe to call in any state, any number of times.
    pub fn logout(&self) {
        {
            let _guard = self.lock();
            self.api.epoch().advance();
            self.clear_store();
            self.state.send_replace(SessionState::Unauthenticated);
        }
        info!("signed out");
        self.navigator.navigate(Route::Login);
        self.api.events().emit(&AuthEvent::LoggedOut);
    }

    /// Decoded hint of the stored credential, for optimistic display only.
    #[must_use]
    pub fn hint(&self) -> Option<TokenHint> {
        let credential = self.stored_credential()?;
        TokenHint::decode(&credential).ok().flatten()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.api.lock_transition()
    }

    fn stored_credential(&self) -> Option<Credential> {
        match self.api.store().read() {
            Ok(credential) => credential,
            Err(err @ StoreError::Decode { .. }) => {
                warn!(error = %err, "token store is corrupt; clearing it");
                self.clear_store();
                None
            }
            Err(err) => {
                error!(error = %err, "token store read failed; treating as signed out");
                None
            }
        }
    }

    fn clear_store(&self) {
        if let Err(err) = self.api.store().clear() {
            error!(error = %err, "failed to clear token store");
        }
    }

    /// Apply `next` if no other flow moved the epoch since `expected`.
    fn commit(&self, expected: u64, next: SessionState, clear: bool) -> bool {
        let _guard = self.lock();
        if self.api.epoch().current() != expected {
            debug!(
                expected,
                state = next.label(),
                "dropping transition from a previous session"
            );
            return false;
        }
        if clear {
            self.clear_store();
        }
        debug!(state = next.label(), "session transition");
        self.state.send_replace(next);
        true
    }

    fn on_unauthorized(&self, epoch: u64, path: &str) {
        {
            let _guard = self.lock();
            if !self.api.epoch().advance_from(epoch) {
                debug!(path, epoch, "ignoring 401 from a previous session");
                return;
            }
            self.clear_store();
            self.state.send_replace(SessionState::Unauthenticated);
        }
        warn!(path, "credential rejected; signing out");
        self.navigator.navigate(Route::Login);
    }
}

impl AuthListener for Session {
    fn on_auth_event(&self, event: &AuthEvent) {
        if let AuthEvent::Unauthorized { epoch, path } = event {
            self.on_unauthorized(*epoch, path);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Session")
            .field("state", &*self.state.borrow())
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
