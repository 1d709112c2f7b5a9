use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{id_string, opt_amount, opt_id_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "opt_amount")]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub unit_price_excl_btw: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub btw_percentage: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub total_excl_btw: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub total_incl_btw: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub order_number: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "opt_amount")]
    pub subtotal_excl_btw: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub btw_amount: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub total_incl_btw: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

fn default_status() -> OrderStatus {
    OrderStatus::Draft
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price_excl_btw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btw_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub items: Vec<OrderItemInput>,
}
