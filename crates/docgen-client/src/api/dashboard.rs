//! `/dashboard/*`.

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Activity, DashboardStats};

#[derive(Clone)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        self.client.get("/dashboard/stats", Vec::new()).await?.field("stats")
    }

    pub async fn activity(&self) -> Result<Vec<Activity>> {
        self.client
            .get("/dashboard/activity", Vec::new())
            .await?
            .field("activity")
    }
}
