use serde::{Deserialize, Serialize};

use super::{id_string, opt_amount, opt_id_string};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAttachment {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    pub file_name: String,
    pub file_url: String,
    #[serde(default)]
    pub file_type: Option<String>,
    /// `datasheet`, `photo`, `manual` or `other`.
    #[serde(default)]
    pub attachment_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub article_number: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub price_excl_btw: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub price_incl_btw: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub btw_percentage: Option<f64>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub attachments: Vec<ProductAttachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_excl_btw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btw_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
