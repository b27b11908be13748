//! Route gating based on session state.
//!
//! Pure functions of [`SessionState`]; the guard owns no state.

use crate::navigation::Route;
use crate::session::SessionState;

/// What the presentation layer should do with a requested view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the view.
    Render,
    /// Session is still being established; show a placeholder.
    Loading,
    /// Send the user elsewhere.
    Redirect(Route),
}

/// Decision for a protected view.
#[must_use]
pub const fn guard(state: &SessionState) -> GuardDecision {
    match state {
        SessionState::Uninitialized => GuardDecision::Loading,
        SessionState::Authenticated(_) => GuardDecision::Render,
        SessionState::Unauthenticated => GuardDecision::Redirect(Route::Login),
    }
}

/// Decision for any view; public views always render.
#[must_use]
pub const fn guard_route(route: &Route, state: &SessionState) -> GuardDecision {
    if route.requires_auth() {
        guard(state)
    } else {
        GuardDecision::Render
    }
}
