//! Routes and the navigator that tracks the active one.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Views of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Customers,
    Products,
    Orders,
    Documents,
    DocumentGenerator,
    Settings,
}

impl Route {
    /// Routes listed in the navigation menu, in display order.
    pub const MENU: [Route; 7] = [
        Route::Dashboard,
        Route::Customers,
        Route::Products,
        Route::Orders,
        Route::Documents,
        Route::DocumentGenerator,
        Route::Settings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Customers => "/customers",
            Route::Products => "/products",
            Route::Orders => "/orders",
            Route::Documents => "/documents",
            Route::DocumentGenerator => "/documents/generate",
            Route::Settings => "/settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::Customers => "Customers",
            Route::Products => "Products",
            Route::Orders => "Orders",
            Route::Documents => "Documents",
            Route::DocumentGenerator => "Generate document",
            Route::Settings => "Settings",
        }
    }

    /// Permission needed for the route to appear in the menu.
    pub fn required_permission(&self) -> Option<&'static str> {
        match self {
            Route::Login => None,
            Route::Dashboard => Some("view_dashboard"),
            Route::Customers => Some("view_customers"),
            Route::Products => Some("view_products"),
            Route::Orders => Some("view_orders"),
            Route::Documents | Route::DocumentGenerator => Some("view_documents"),
            Route::Settings => Some("view_settings"),
        }
    }

    /// Whether the route requires an authenticated session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Resolve a path. `/` and unknown paths land on the dashboard.
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match trimmed {
            "/login" => Route::Login,
            "/customers" => Route::Customers,
            "/products" => Route::Products,
            "/orders" => Route::Orders,
            "/documents" => Route::Documents,
            "/documents/generate" => Route::DocumentGenerator,
            "/settings" => Route::Settings,
            _ => Route::Dashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Holds the active route. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Arc<watch::Sender<Route>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            current: Arc::new(tx),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn navigate(&self, route: Route) {
        let previous = self.current.send_replace(route);
        if previous != route {
            tracing::debug!(from = %previous, to = %route, "Navigated");
        }
    }

    pub fn redirect_to_login(&self) {
        self.navigate(Route::Login);
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Route::Dashboard);
        assert_eq!(Route::from_path("/customers/"), Route::Customers);
        assert_eq!(Route::from_path("/documents/generate?order=1"), Route::DocumentGenerator);
        assert_eq!(Route::from_path("/nope"), Route::Dashboard);
        assert_eq!(Route::from_path("/login"), Route::Login);
    }

    #[test]
    fn test_every_route_round_trips_its_path() {
        for route in Route::MENU.iter().chain(std::iter::once(&Route::Login)) {
            assert_eq!(Route::from_path(route.path()), *route);
        }
    }

    #[test]
    fn test_clones_share_state() {
        let nav = Navigator::default();
        let other = nav.clone();
        let rx = nav.subscribe();
        other.redirect_to_login();
        assert_eq!(nav.current(), Route::Login);
        assert_eq!(*rx.borrow(), Route::Login);
    }
}
