//! Typed services over the REST collaborator.
//!
//! | Service | Paths |
//! |---------|-------|
//! | [`AuthService`] | `/auth/*`, `/users/profile` |
//! | [`CustomerService`] | `/customers` |
//! | [`ProductService`] | `/products` |
//! | [`OrderService`] | `/orders` |
//! | [`DocumentService`] | `/documents*` |
//! | [`DashboardService`] | `/dashboard/*` |
//!
//! All of them share one [`ApiClient`], so bearer injection and the 401
//! policy apply uniformly.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod documents;
pub mod orders;
pub mod products;

pub use auth::AuthService;
pub use customers::CustomerService;
pub use dashboard::DashboardService;
pub use documents::DocumentService;
pub use orders::OrderService;
pub use products::ProductService;

use crate::error::{ApiError, Result};
use crate::http::ApiClient;

/// Join `segments` into an API path, percent-encoding each one so a
/// user-supplied id stays a single segment. Empty and dot segments would be
/// collapsed by URL normalization and are rejected.
pub(crate) fn endpoint(segments: &[&str]) -> Result<String> {
    segments
        .iter()
        .map(|segment| match segment.trim() {
            "" | "." | ".." => Err(ApiError::InvalidPath(segment.to_string())),
            _ => Ok(format!("/{}", urlencoding::encode(segment))),
        })
        .collect()
}

/// All services over one client.
#[derive(Clone)]
pub struct Api {
    auth: AuthService,
    customers: CustomerService,
    products: ProductService,
    orders: OrderService,
    documents: DocumentService,
    dashboard: DashboardService,
}

impl Api {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            customers: CustomerService::new(client.clone()),
            products: ProductService::new(client.clone()),
            orders: OrderService::new(client.clone()),
            documents: DocumentService::new(client.clone()),
            dashboard: DashboardService::new(client),
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn customers(&self) -> &CustomerService {
        &self.customers
    }

    pub fn products(&self) -> &ProductService {
        &self.products
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    pub fn documents(&self) -> &DocumentService {
        &self.documents
    }

    pub fn dashboard(&self) -> &DashboardService {
        &self.dashboard
    }
}
