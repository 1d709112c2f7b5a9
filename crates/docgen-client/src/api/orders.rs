//! `/orders`.

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{ListParams, Order, OrderItem, OrderItemInput, OrderInput, Page};

use super::endpoint;

#[derive(Clone)]
pub struct OrderService {
    client: ApiClient,
}

impl OrderService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Filters: `search`, `status`, `customer_id`.
    pub async fn list(&self, params: &ListParams) -> Result<Page<Order>> {
        self.client.get("/orders", params.to_query()).await?.json()
    }

    pub async fn get(&self, id: &str) -> Result<Order> {
        self.client
            .get(&endpoint(&["orders", id])?, Vec::new())
            .await?
            .field("order")
    }

    pub async fn create(&self, input: &OrderInput) -> Result<Order> {
        self.client.post("/orders", input).await?.field("order")
    }

    pub async fn update(&self, id: &str, input: &OrderInput) -> Result<Order> {
        self.client
            .put(&endpoint(&["orders", id])?, input)
            .await?
            .field("order")
    }

    pub async fn add_item(&self, order_id: &str, item: &OrderItemInput) -> Result<OrderItem> {
        self.client
            .post(&endpoint(&["orders", order_id, "items"])?, item)
            .await?
            .field("item")
    }

    pub async fn update_item(&self, order_id: &str, item_id: &str, item: &OrderItemInput) -> Result<OrderItem> {
        self.client
            .put(&endpoint(&["orders", order_id, "items", item_id])?, item)
            .await?
            .field("item")
    }

    pub async fn delete_item(&self, order_id: &str, item_id: &str) -> Result<()> {
        self.client
            .delete(&endpoint(&["orders", order_id, "items", item_id])?)
            .await?;
        Ok(())
    }
}
