use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use httpmock::MockServer;
use httpmock::prelude::*;
use reqwest::{Client, Url};
use serde_json::json;
use studylink_api_models::LoginRequest;
use studylink_session::{
    ApiClient, ApiError, Credential, FileTokenStore, GuardDecision, HistoryNavigator,
    IdentityClaims, MemoryTokenStore, Navigator, Route, Session, SessionError, SessionState,
    StoreError, TokenStore, guard_route,
};
use tokio::task::JoinSet;

const PROFILE_PATH: &str = "/api/members/me";

/// Memory store that counts how often it was cleared while holding a credential.
#[derive(Default)]
struct CountingStore {
    inner: MemoryTokenStore,
    effective_clears: AtomicUsize,
}

impl TokenStore for CountingStore {
    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        self.inner.save(credential)
    }

    fn read(&self) -> Result<Option<Credential>, StoreError> {
        self.inner.read()
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.inner.read()?.is_some() {
            self.effective_clears.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.clear()
    }
}

struct App {
    session: Arc<Session>,
    navigator: Arc<HistoryNavigator>,
}

fn app(server: &MockServer, store: Arc<dyn TokenStore>) -> Result<App> {
    let api = ApiClient::with_client(Client::new(), Url::parse(&server.base_url())?, store);
    let navigator = Arc::new(HistoryNavigator::default());
    let session = Session::new(api, Arc::clone(&navigator) as Arc<dyn Navigator>);
    Ok(App { session, navigator })
}

fn mock_profile<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
    let bearer = format!("Bearer {token}");
    server.mock(move |when, then| {
        when.method(GET)
            .path(PROFILE_PATH)
            .header("authorization", bearer.as_str());
        then.status(200).json_body(json!({
            "id": 1,
            "email": "ann@example.com",
            "nickname": "ann",
            "tags": ["rust"]
        }));
    })
}

fn structured_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

fn ann() -> IdentityClaims {
    IdentityClaims {
        id: 1,
        nickname: "ann".into(),
        email: "ann@example.com".into(),
    }
}

#[tokio::test]
async fn login_then_logout_leaves_nothing_behind() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_profile(&server, "tok-123");
    let store = Arc::new(MemoryTokenStore::new());
    let app = app(&server, Arc::clone(&store) as Arc<dyn TokenStore>)?;

    let claims = app.session.login("tok-123").await?;
    assert_eq!(claims, ann());
    assert_eq!(app.session.state(), SessionState::Authenticated(ann()));
    assert_eq!(store.read()?, Credential::new("tok-123"));
    assert_eq!(app.navigator.current(), Route::Home);

    app.session.logout();
    assert_eq!(app.session.state(), SessionState::Unauthenticated);
    assert!(store.read()?.is_none());
    assert_eq!(app.navigator.current(), Route::Login);
    Ok(())
}

#[tokio::test]
async fn login_while_authenticated_is_rejected() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_profile(&server, "tok-123");
    let app = app(&server, Arc::new(MemoryTokenStore::new()))?;

    app.session.login("tok-123").await?;
    assert!(matches!(
        app.session.login("tok-other").await,
        Err(SessionError::AlreadyAuthenticated)
    ));
    assert_eq!(app.session.state(), SessionState::Authenticated(ann()));
    Ok(())
}

#[tokio::test]
async fn claims_failure_after_login_clears_the_store() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path(PROFILE_PATH);
        then.status(500).body("boom");
    });
    let store = Arc::new(MemoryTokenStore::new());
    let app = app(&server, Arc::clone(&store) as Arc<dyn TokenStore>)?;

    let result = app.session.login("tok-456").await;
    assert!(matches!(result, Err(SessionError::ClaimsUnavailable { .. })));
    assert_eq!(app.session.state(), SessionState::Unauthenticated);
    assert!(store.read()?.is_none());
    Ok(())
}

#[tokio::test]
async fn initialize_without_credential_makes_no_request() -> Result<()> {
    let server = MockServer::start_async().await;
    let profile = mock_profile(&server, "tok-123");
    let app = app(&server, Arc::new(MemoryTokenStore::new()))?;
    let mut states = app.session.subscribe();
    assert_eq!(*states.borrow_and_update(), SessionState::Uninitialized);

    assert_eq!(app.session.initialize().await, SessionState::Unauthenticated);
    assert!(states.has_changed()?);
    profile.assert_calls(0);
    assert_eq!(
        guard_route(&Route::MyPage, &app.session.state()),
        GuardDecision::Redirect(Route::Login)
    );
    Ok(())
}

#[tokio::test]
async fn initialize_clears_expired_credential() -> Result<()> {
    let server = MockServer::start_async().await;
    let token = structured_token(&json!({"sub": "ann@example.com", "exp": 1_600_000_000}));
    let profile = mock_profile(&server, &token);
    let store = Arc::new(MemoryTokenStore::new());
    store.save(&Credential::new(token.as_str()).ok_or_else(|| anyhow!("credential"))?)?;
    let app = app(&server, Arc::clone(&store) as Arc<dyn TokenStore>)?;

    assert_eq!(app.session.initialize().await, SessionState::Unauthenticated);
    assert!(store.read()?.is_none());
    profile.assert_calls(0);
    Ok(())
}

#[tokio::test]
async fn initialize_restores_session_from_file_store() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_profile(&server, "tok-123");
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");

    let first = app(&server, Arc::new(FileTokenStore::new(&path)))?;
    first.session.login("tok-123").await?;
    drop(first);

    let second = app(&server, Arc::new(FileTokenStore::new(&path)))?;
    assert_eq!(second.session.initialize().await, SessionState::Authenticated(ann()));
    assert_eq!(
        guard_route(&Route::MyPage, &second.session.state()),
        GuardDecision::Render
    );
    Ok(())
}

#[tokio::test]
async fn data_request_401_signs_out_and_reaches_caller() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_profile(&server, "tok-123");
    server.mock(|when, then| {
        when.method(GET).path("/api/members/me/applications");
        then.status(401);
    });
    let store = Arc::new(MemoryTokenStore::new());
    let app = app(&server, Arc::clone(&store) as Arc<dyn TokenStore>)?;
    app.session.login("tok-123").await?;

    let result = app.session.api().my_applications().await;
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert!(store.read()?.is_none());
    assert_eq!(app.session.state(), SessionState::Unauthenticated);
    assert_eq!(app.navigator.current(), Route::Login);
    Ok(())
}

#[tokio::test]
async fn concurrent_401s_clear_exactly_once() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_profile(&server, "tok-123");
    server.mock(|when, then| {
        when.method(GET).path("/api/members/me/study-groups");
        then.status(401).delay(Duration::from_millis(300));
    });
    let store = Arc::new(CountingStore::default());
    let app = app(&server, Arc::clone(&store) as Arc<dyn TokenStore>)?;
    app.session.login("tok-123").await?;
    let epoch = app.session.api().epoch().current();

    let mut requests = JoinSet::new();
    for _ in 0..8 {
        let api = app.session.api().clone();
        requests.spawn(async move { api.my_study_groups().await });
    }
    while let Some(result) = requests.join_next().await {
        assert!(matches!(result?, Err(ApiError::Unauthorized { .. })));
    }

    assert!(store.read()?.is_none());
    assert_eq!(store.effective_clears.load(Ordering::SeqCst), 1);
    assert_eq!(app.session.api().epoch().current(), epoch + 1);
    assert_eq!(app.session.state(), SessionState::Unauthenticated);
    Ok(())
}

#[tokio::test]
async fn late_success_after_logout_is_discarded() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_profile(&server, "tok-123");
    server.mock(|when, then| {
        when.method(GET).path("/api/members/me/interests");
        then.status(200)
            .json_body(json!([]))
            .delay(Duration::from_millis(200));
    });
    let app = app(&server, Arc::new(MemoryTokenStore::new()))?;
    app.session.login("tok-123").await?;

    let in_flight = {
        let api = app.session.api().clone();
        tokio::spawn(async move { api.my_interests().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    app.session.logout();

    assert!(matches!(in_flight.await?, Err(ApiError::Stale { .. })));
    assert_eq!(app.session.state(), SessionState::Unauthenticated);
    Ok(())
}

#[tokio::test]
async fn logout_during_login_wins() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path(PROFILE_PATH);
        then.status(200)
            .json_body(json!({"id": 1, "email": "ann@example.com", "nickname": "ann"}))
            .delay(Duration::from_millis(200));
    });
    let store = Arc::new(MemoryTokenStore::new());
    let app = app(&server, Arc::clone(&store) as Arc<dyn TokenStore>)?;

    let login = {
        let session = Arc::clone(&app.session);
        tokio::spawn(async move { session.login("tok-123").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    app.session.logout();

    assert!(matches!(login.await?, Err(SessionError::Superseded)));
    assert_eq!(app.session.state(), SessionState::Unauthenticated);
    assert!(store.read()?.is_none());
    Ok(())
}

#[tokio::test]
async fn sign_in_exchanges_password_for_session() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/login")
            .json_body(json!({"email": "ann@example.com", "password": "hunter2"}));
        then.status(200).json_body(json!({"accessToken": "tok-123"}));
    });
    mock_profile(&server, "tok-123");
    let app = app(&server, Arc::new(MemoryTokenStore::new()))?;

    let request = LoginRequest {
        email: "ann@example.com".into(),
        password: "hunter2".into(),
    };
    assert_eq!(app.session.sign_in(&request).await?, ann());
    assert_eq!(app.navigator.current(), Route::Home);
    Ok(())
}

#[tokio::test]
async fn sign_in_with_bad_password_is_invalid_credentials() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/auth/login");
        then.status(401).body("bad credentials");
    });
    let app = app(&server, Arc::new(MemoryTokenStore::new()))?;

    let request = LoginRequest {
        email: "ann@example.com".into(),
        password: "wrong".into(),
    };
    assert!(matches!(
        app.session.sign_in(&request).await,
        Err(SessionError::InvalidCredentials { .. })
    ));
    assert!(!app.session.state().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn accepted_credential_is_stored_verbatim() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path(PROFILE_PATH).header_exists("authorization");
        then.status(200)
            .json_body(json!({"id": 1, "email": "ann@example.com", "nickname": "ann"}));
    });
    let store = Arc::new(MemoryTokenStore::new());
    let app = app(&server, Arc::clone(&store) as Arc<dyn TokenStore>)?;

    app.session.login(" tok-123 ").await?;
    let stored = store.read()?.ok_or_else(|| anyhow!("credential missing"))?;
    assert_eq!(stored.expose(), " tok-123 ");
    Ok(())
}

#[tokio::test]
async fn corrupt_token_file_is_cleared_on_startup() -> Result<()> {
    let server = MockServer::start_async().await;
    let profile = mock_profile(&server, "tok-123");
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");
    std::fs::write(&path, b"{not json")?;

    let app = app(&server, Arc::new(FileTokenStore::new(&path)))?;
    assert_eq!(app.session.initialize().await, SessionState::Unauthenticated);
    assert!(!path.exists());
    profile.assert_calls(0);
    Ok(())
}
