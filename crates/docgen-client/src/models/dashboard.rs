use serde::{Deserialize, Serialize};

use super::Order;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub customers: u64,
    #[serde(default)]
    pub products: u64,
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub documents: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`.
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub overview: Overview,
    #[serde(default)]
    pub recent_orders: Vec<Order>,
    #[serde(default)]
    pub order_status_distribution: Vec<StatusCount>,
    #[serde(default)]
    pub monthly_revenue: Vec<MonthlyRevenue>,
    #[serde(default)]
    pub user_stats: serde_json::Value,
}

impl DashboardStats {
    pub fn total_revenue(&self) -> f64 {
        self.monthly_revenue.iter().map(|m| m.revenue).sum()
    }
}

/// Audit trail entry from `/dashboard/activity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
