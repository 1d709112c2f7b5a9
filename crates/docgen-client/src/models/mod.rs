//! Wire types of the document generator API.
//!
//! Records are deliberately lenient: identifiers may arrive as numbers or
//! strings, amounts as numbers or decimal strings, and unknown fields are
//! ignored.

mod customer;
mod dashboard;
mod document;
mod order;
mod product;
mod user;

pub use customer::{Customer, CustomerAddress, CustomerContact, CustomerInput};
pub use dashboard::{Activity, DashboardStats, MonthlyRevenue, Overview, StatusCount};
pub use document::{
    DocumentStatus, DocumentTemplate, DocumentType, GenerateDocumentRequest, GeneratedDocument,
    GenerationResult, PreviewResult, google_doc_url,
};
pub use order::{Order, OrderInput, OrderItem, OrderItemInput, OrderStatus};
pub use product::{Product, ProductAttachment, ProductCategory, ProductInput};
pub use user::{Principal, Role, Session, User};

use serde::{Deserialize, Deserializer, Serialize};

/// Pagination block of list responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub has_next: bool,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
        }
    }
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters shared by list endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    /// Endpoint-specific filters (`active`, `status`, `customer_id`, ...).
    pub filters: Vec<(String, String)>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        if !search.trim().is_empty() {
            self.search = Some(search);
        }
        self
    }

    pub fn sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((key.into(), value.to_string()));
        self
    }

    /// Flatten into query pairs, omitting unset values.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search".to_string(), search.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            query.push(("sort_by".to_string(), sort_by.clone()));
        }
        if let Some(order) = self.sort_order {
            let order = match order {
                SortOrder::Asc => "asc",
                SortOrder::Desc => "desc",
            };
            query.push(("sort_order".to_string(), order.to_string()));
        }
        query.extend(self.filters.iter().cloned());
        query
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
}

/// Identifier that may be encoded as a number or a string.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
    })
}

pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Str(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
    }))
}

/// `null` treated like a missing field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Amount that may be encoded as a number or a decimal string.
pub(crate) fn opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Int(n)) => Ok(Some(n as f64)),
        Some(Scalar::Float(f)) => Ok(Some(f)),
        Some(Scalar::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Scalar::Str(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_query() {
        let params = ListParams::new()
            .page(2)
            .per_page(50)
            .search("  ")
            .sort("company_name", SortOrder::Asc)
            .filter("active", true);
        let query = params.to_query();
        assert_eq!(
            query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "50".to_string()),
                ("sort_by".to_string(), "company_name".to_string()),
                ("sort_order".to_string(), "asc".to_string()),
                ("active".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_deserialization() {
        let page: Page<Customer> = serde_json::from_value(serde_json::json!({
            "items": [{"id": "c-1", "company_name": "Acme BV", "payment_terms": 14}],
            "pagination": {"page": 1, "per_page": 20, "total": 1, "pages": 1,
                            "has_prev": false, "has_next": false, "prev_num": null, "next_num": null}
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].company_name, "Acme BV");
        assert_eq!(page.pagination.total, 1);
    }
}
