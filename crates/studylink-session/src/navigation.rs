//! In-app navigation primitive and the views it can target.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use studylink_api_models::EntityId;
use tracing::debug;

/// Views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page with listings and recommendations.
    Home,
    /// Login form.
    Login,
    /// Signup form.
    Signup,
    /// Search results.
    Search,
    /// The member's own dashboard.
    MyPage,
    /// Profile editor.
    ProfileEdit,
    /// Study group creation form.
    StudyCreate,
    /// One study group with its comments.
    StudyDetail(EntityId),
    /// Owner view of a group's applications.
    StudyManage(EntityId),
    /// Study group editor.
    StudyEdit(EntityId),
}

impl Route {
    /// Path of the view.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Search => "/search".to_string(),
            Self::MyPage => "/mypage".to_string(),
            Self::ProfileEdit => "/profile/edit".to_string(),
            Self::StudyCreate => "/study/create".to_string(),
            Self::StudyDetail(id) => format!("/study/{id}"),
            Self::StudyManage(id) => format!("/study/{id}/manage"),
            Self::StudyEdit(id) => format!("/study/{id}/edit"),
        }
    }

    /// Resolve a path back to a view. Query strings and trailing slashes are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Self::Home),
            ["login"] => Some(Self::Login),
            ["signup"] => Some(Self::Signup),
            ["search"] => Some(Self::Search),
            ["mypage"] => Some(Self::MyPage),
            ["profile", "edit"] => Some(Self::ProfileEdit),
            ["study", "create"] => Some(Self::StudyCreate),
            ["study", id] => id.parse().ok().map(Self::StudyDetail),
            ["study", id, "manage"] => id.parse().ok().map(Self::StudyManage),
            ["study", id, "edit"] => id.parse().ok().map(Self::StudyEdit),
            _ => None,
        }
    }

    /// Whether the view is only reachable with an authenticated session.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        !matches!(self, Self::Home | Self::Login | Self::Signup | Self::Search)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.path())
    }
}

/// Client-side router primitive.
pub trait Navigator: Send + Sync {
    /// Move the application to `route` without reloading it.
    fn navigate(&self, route: Route);
}

/// [`Navigator`] that keeps an in-memory history stack.
#[derive(Debug)]
pub struct HistoryNavigator {
    entries: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    /// History starting at `initial`.
    #[must_use]
    pub fn new(initial: Route) -> Self {
        Self {
            entries: Mutex::new(vec![initial]),
        }
    }

    /// Route currently displayed.
    #[must_use]
    pub fn current(&self) -> Route {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
            .unwrap_or(Route::Home)
    }

    /// Every route visited, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.last() == Some(&route) {
            return;
        }
        debug!(to = %route, "navigate");
        entries.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_through_parse() {
        for route in [
            Route::Home,
            Route::Login,
            Route::MyPage,
            Route::ProfileEdit,
            Route::StudyCreate,
            Route::StudyDetail(42),
            Route::StudyManage(7),
            Route::StudyEdit(9),
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn parse_ignores_query_and_rejects_unknown_paths() {
        assert_eq!(Route::parse("/search?search=rust"), Some(Route::Search));
        assert_eq!(Route::parse("/study/abc"), None);
        assert_eq!(Route::parse("/admin"), None);
    }

    #[test]
    fn public_views_do_not_require_auth() {
        assert!(!Route::Home.requires_auth());
        assert!(!Route::Login.requires_auth());
        assert!(!Route::Search.requires_auth());
        assert!(Route::MyPage.requires_auth());
        assert!(Route::StudyDetail(1).requires_auth());
    }

    #[test]
    fn history_navigator_collapses_repeated_targets() {
        let navigator = HistoryNavigator::default();
        navigator.navigate(Route::Login);
        navigator.navigate(Route::Login);
        navigator.navigate(Route::Home);
        assert_eq!(navigator.current(), Route::Home);
        assert_eq!(
            navigator.history(),
            vec![Route::Home, Route::Login, Route::Home]
        );
    }
}
