//! Route guard: decides whether a view may render for the current session.

use tokio::sync::watch;

use crate::models::{Principal, Session};
use crate::navigation::Route;
use crate::session::AuthState;

/// Outcome of guarding a route.
#[derive(Debug, Clone, PartialEq)]
pub enum Access<T> {
    /// Session not settled yet: show a wait indicator, never the login view.
    Pending,
    /// Go elsewhere instead.
    Redirect(Route),
    /// Render.
    Granted(T),
}

impl<T> Access<T> {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Access<U> {
        match self {
            Access::Pending => Access::Pending,
            Access::Redirect(route) => Access::Redirect(route),
            Access::Granted(value) => Access::Granted(f(value)),
        }
    }
}

pub struct RouteGuard;

impl RouteGuard {
    /// Guard `route` and call `render` with the session only when allowed.
    pub fn protect<T, F>(state: &AuthState, route: Route, render: F) -> Access<T>
    where
        F: FnOnce(Option<&Session>) -> T,
    {
        match (state, route.is_protected()) {
            (AuthState::Unknown | AuthState::Loading, _) => Access::Pending,
            (AuthState::Anonymous, true) => Access::Redirect(Route::Login),
            (AuthState::Anonymous, false) => Access::Granted(render(None)),
            (AuthState::Authenticated(_), false) => Access::Redirect(Route::Dashboard),
            (AuthState::Authenticated(session), true) => Access::Granted(render(Some(session))),
        }
    }

    pub fn check(state: &AuthState, route: Route) -> Access<Route> {
        Self::protect(state, route, |_| route)
    }

    /// Guard a raw path; `/` and unknown paths mean the dashboard.
    pub fn resolve(state: &AuthState, path: &str) -> Access<Route> {
        Self::check(state, Route::from_path(path))
    }

    /// Menu entries the principal may see.
    pub fn visible_routes(principal: &Principal) -> Vec<Route> {
        Route::MENU
            .into_iter()
            .filter(|route| match route.required_permission() {
                Some(permission) => principal.has_permission(permission),
                None => true,
            })
            .collect()
    }

    /// Wait until the session leaves `Unknown`/`Loading`.
    pub async fn settle(rx: &mut watch::Receiver<AuthState>) -> AuthState {
        match rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => state.clone(),
            Err(_) => AuthState::Anonymous,
        }
    }
}
