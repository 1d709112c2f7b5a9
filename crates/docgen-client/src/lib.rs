//! Client library for the document generator back office.
//!
//! The crate owns everything between a user and the REST API: the
//! authenticated HTTP client, the session state machine, route guarding,
//! persisted preferences and the typed services for customers, products,
//! orders, documents and the dashboard.
//!
//! ```no_run
//! use std::sync::Arc;
//! use docgen_client::{ClientConfig, Docgen, MemoryStore};
//!
//! # async fn demo() -> docgen_client::Result<()> {
//! let docgen = Docgen::connect(&ClientConfig::from_env()?, Arc::new(MemoryStore::new()))?;
//! docgen.session.init().await;
//! docgen.session.login("jan@bedrijf.nl", "geheim123").await?;
//! let customers = docgen.api.customers().list(&Default::default()).await?;
//! println!("{} customers", customers.pagination.total);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod models;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod theme;
pub mod token;
pub mod validate;

use std::sync::Arc;

pub use api::Api;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use guard::{Access, RouteGuard};
pub use http::{ApiClient, ApiResponse, Body, RequestOptions};
pub use navigation::{Navigator, Route};
pub use reqwest::{Method, StatusCode};
pub use session::{AuthState, SessionHandle, SessionStore};
pub use storage::{FileStore, MemoryStore, StateStore};
pub use theme::{Theme, ThemePreference};

/// Session store and services wired to one client.
pub struct Docgen {
    pub session: SessionStore,
    pub api: Api,
}

impl Docgen {
    pub fn connect(config: &ClientConfig, store: Arc<dyn StateStore>) -> Result<Self> {
        let handle = SessionHandle::new(store);
        let client = ApiClient::new(config, handle, Navigator::default())?;
        Ok(Self {
            session: SessionStore::new(client.clone()),
            api: Api::new(client),
        })
    }

    pub fn client(&self) -> &ApiClient {
        self.session.client()
    }

    pub fn navigator(&self) -> &Navigator {
        self.client().navigator()
    }
}
