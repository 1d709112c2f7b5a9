//! `/products`.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{ListParams, Page, Product, ProductAttachment, ProductCategory, ProductInput};

use super::endpoint;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Clone)]
pub struct ProductService {
    client: ApiClient,
}

impl ProductService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Filters: `search`, `category_id`, `active`.
    pub async fn list(&self, params: &ListParams) -> Result<Page<Product>> {
        self.client.get("/products", params.to_query()).await?.json()
    }

    pub async fn get(&self, id: &str) -> Result<Product> {
        self.client
            .get(&endpoint(&["products", id])?, Vec::new())
            .await?
            .field("product")
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product> {
        self.client.post("/products", input).await?.field("product")
    }

    pub async fn update(&self, id: &str, input: &ProductInput) -> Result<Product> {
        self.client
            .put(&endpoint(&["products", id])?, input)
            .await?
            .field("product")
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&endpoint(&["products", id])?).await?;
        Ok(())
    }

    pub async fn categories(&self) -> Result<Vec<ProductCategory>> {
        self.client
            .get("/products/categories", Vec::new())
            .await?
            .field("categories")
    }

    pub async fn create_category(&self, input: &CategoryInput) -> Result<ProductCategory> {
        self.client
            .post("/products/categories", input)
            .await?
            .field("category")
    }

    /// Register an attachment that is already hosted somewhere.
    pub async fn add_attachment(&self, id: &str, attachment: &ProductAttachment) -> Result<ProductAttachment> {
        self.client
            .post(&endpoint(&["products", id, "attachments"])?, attachment)
            .await?
            .field("attachment")
    }

    /// Upload a local file as an attachment.
    pub async fn upload_attachment(&self, id: &str, file: &Path, attachment_type: &str) -> Result<ProductAttachment> {
        self.client
            .upload_file(
                &endpoint(&["products", id, "attachments"])?,
                file,
                &[("attachment_type".to_string(), attachment_type.to_string())],
            )
            .await?
            .field("attachment")
    }
}
