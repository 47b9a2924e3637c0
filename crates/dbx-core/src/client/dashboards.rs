//! Lakeview dashboard operations.

use super::WorkspaceClient;
use crate::error::Result;
use crate::models::dashboards::*;
use serde_json::Value;

impl WorkspaceClient {
    pub async fn list_dashboards(&self) -> Result<DashboardList> {
        self.get("/api/2.0/lakeview/dashboards").await
    }

    pub async fn get_dashboard(&self, dashboard_id: &str) -> Result<Dashboard> {
        self.get(&format!("/api/2.0/lakeview/dashboards/{dashboard_id}"))
            .await
    }

    pub async fn create_dashboard(&self, req: &DashboardRequest) -> Result<Dashboard> {
        self.post("/api/2.0/lakeview/dashboards", req).await
    }

    pub async fn update_dashboard(&self, dashboard_id: &str, req: &DashboardRequest) -> Result<Dashboard> {
        self.patch(&format!("/api/2.0/lakeview/dashboards/{dashboard_id}"), req)
            .await
    }

    /// Move a dashboard to the trash. Trashed dashboards can be restored from
    /// the workspace UI.
    pub async fn trash_dashboard(&self, dashboard_id: &str) -> Result<Value> {
        self.delete(&format!("/api/2.0/lakeview/dashboards/{dashboard_id}"))
            .await
    }
}
