//! Application context, CLI error types, and the error-to-exit-code mapping.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::anyhow;
use studylink_session::{
    ApiClient, ApiError, GuardDecision, HistoryNavigator, Navigator, Route, Session, SessionError,
    guard_route,
};
use tracing::debug;

use crate::cli::OutputFormat;

/// CLI-level error type separating bad input, operational failures, and
/// pages that need a signed-in session.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
    LoginRequired(String),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) fn login_required(message: impl Into<String>) -> Self {
        Self::LoginRequired(message.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::LoginRequired(_) => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::LoginRequired(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized { .. } => Self::login_required(
                "the server rejected the stored session; signed out. Run `studylink login`",
            ),
            ApiError::Rejected { ref message, .. } if error.is_validation() => {
                Self::Validation(message.clone())
            }
            other => Self::failure(other),
        }
    }
}

impl From<SessionError> for CliError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::AlreadyAuthenticated => {
                Self::validation("already signed in; run `studylink logout` first")
            }
            SessionError::MalformedCredential => {
                Self::validation("the supplied token is empty or unreadable")
            }
            SessionError::InvalidCredentials { .. } => {
                Self::validation("email or password was rejected")
            }
            SessionError::Api { source } => Self::from(source),
            other => Self::failure(other),
        }
    }
}

/// Shared state handed to every command handler.
pub(crate) struct AppContext {
    pub(crate) session: Arc<Session>,
    pub(crate) navigator: Arc<HistoryNavigator>,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    pub(crate) const fn new(
        session: Arc<Session>,
        navigator: Arc<HistoryNavigator>,
        output: OutputFormat,
    ) -> Self {
        Self {
            session,
            navigator,
            output,
        }
    }

    pub(crate) fn api(&self) -> &ApiClient {
        self.session.api()
    }

    /// Navigate to `route` and run the guard against the settled session.
    pub(crate) fn open(&self, route: Route) -> CliResult<()> {
        self.navigator.navigate(route);
        match guard_route(&route, &self.session.state()) {
            GuardDecision::Render => {
                debug!(%route, "rendering page");
                Ok(())
            }
            GuardDecision::Loading => Err(CliError::failure(anyhow!(
                "session is still initialising; cannot open {route}"
            ))),
            GuardDecision::Redirect(target) => {
                self.navigator.navigate(target);
                Err(CliError::login_required(format!(
                    "{route} requires a signed-in session; run `studylink login`"
                )))
            }
        }
    }
}
