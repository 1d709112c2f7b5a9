//! `/customers`.

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Customer, CustomerAddress, CustomerContact, CustomerInput, ListParams, Page};

use super::endpoint;

#[derive(Clone)]
pub struct CustomerService {
    client: ApiClient,
}

impl CustomerService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Filters: `search`, `active`; sortable by any customer column.
    pub async fn list(&self, params: &ListParams) -> Result<Page<Customer>> {
        self.client.get("/customers", params.to_query()).await?.json()
    }

    pub async fn get(&self, id: &str) -> Result<Customer> {
        self.client
            .get(&endpoint(&["customers", id])?, Vec::new())
            .await?
            .field("customer")
    }

    pub async fn create(&self, input: &CustomerInput) -> Result<Customer> {
        self.client.post("/customers", input).await?.field("customer")
    }

    pub async fn update(&self, id: &str, input: &CustomerInput) -> Result<Customer> {
        self.client
            .put(&endpoint(&["customers", id])?, input)
            .await?
            .field("customer")
    }

    /// The backend deactivates rather than deletes.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&endpoint(&["customers", id])?).await?;
        Ok(())
    }

    pub async fn add_address(&self, id: &str, address: &CustomerAddress) -> Result<CustomerAddress> {
        self.client
            .post(&endpoint(&["customers", id, "addresses"])?, address)
            .await?
            .field("address")
    }

    pub async fn add_contact(&self, id: &str, contact: &CustomerContact) -> Result<CustomerContact> {
        self.client
            .post(&endpoint(&["customers", id, "contacts"])?, contact)
            .await?
            .field("contact")
    }
}
