//! Lakeview dashboards.

use serde::{Deserialize, Serialize};

/// Response from `GET /api/2.0/lakeview/dashboards`
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardList {
    pub dashboards: Option<Vec<Dashboard>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub dashboard_id: Option<String>,
    pub display_name: Option<String>,
    pub warehouse_id: Option<String>,
    pub etag: Option<String>,
    pub path: Option<String>,
    pub parent_path: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub lifecycle_state: Option<String>,
    pub serialized_dashboard: Option<String>,
}

/// Request body for Lakeview dashboard create/update.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serialized_dashboard: Option<String>,
}
