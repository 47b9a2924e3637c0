//! Lakeview dashboard tools.

use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::server::McpServer;
use crate::tools::respond;
use dbx_core::models::dashboards::DashboardRequest;
use dbx_core::Result;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct DashboardIdParams {
    /// Dashboard ID
    pub dashboard_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateDashboardParams {
    /// Dashboard spec (display_name, warehouse_id, parent_path, serialized_dashboard)
    pub dashboard_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UpdateDashboardParams {
    /// Dashboard ID
    pub dashboard_id: String,
    /// Fields to change (display_name, warehouse_id, serialized_dashboard)
    pub dashboard_config: Value,
}

fn dashboard_request_from(config: &Value) -> DashboardRequest {
    let field = |name: &str| {
        config
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    DashboardRequest {
        display_name: field("display_name"),
        warehouse_id: field("warehouse_id"),
        parent_path: field("parent_path"),
        serialized_dashboard: field("serialized_dashboard"),
    }
}

#[tool_router(router = dashboards_router, vis = "pub(crate)")]
impl McpServer {
    #[tool(description = "List Lakeview dashboards in the workspace.")]
    async fn list_lakeview_dashboards(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_dashboards().await?;
            let dashboards = list.dashboards.unwrap_or_default();
            let count = dashboards.len();
            Ok(json!({
                "dashboards": dashboards,
                "count": count,
                "next_page_token": list.next_page_token,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a Lakeview dashboard by ID, including its serialized definition.")]
    async fn get_lakeview_dashboard(
        &self,
        Parameters(params): Parameters<DashboardIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            let dashboard = self.client.get_dashboard(&params.dashboard_id).await?;
            Ok(json!({ "dashboard": dashboard }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a Lakeview dashboard. Spec needs at least display_name.")]
    async fn create_lakeview_dashboard(
        &self,
        Parameters(params): Parameters<CreateDashboardParams>,
    ) -> String {
        let result: Result<Value> = async {
            let request = dashboard_request_from(&params.dashboard_config);
            let dashboard = self.client.create_dashboard(&request).await?;
            Ok(json!({
                "dashboard": dashboard,
                "message": "Dashboard created",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Update a Lakeview dashboard's name, warehouse or definition.")]
    async fn update_lakeview_dashboard(
        &self,
        Parameters(params): Parameters<UpdateDashboardParams>,
    ) -> String {
        let result: Result<Value> = async {
            let request = dashboard_request_from(&params.dashboard_config);
            let dashboard = self
                .client
                .update_dashboard(&params.dashboard_id, &request)
                .await?;
            Ok(json!({
                "dashboard": dashboard,
                "message": format!("Dashboard {} updated", params.dashboard_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Move a Lakeview dashboard to the trash.")]
    async fn delete_lakeview_dashboard(
        &self,
        Parameters(params): Parameters<DashboardIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client.trash_dashboard(&params.dashboard_id).await?;
            Ok(json!({
                "dashboard_id": params.dashboard_id,
                "message": format!("Dashboard {} moved to trash", params.dashboard_id),
            }))
        }
        .await;
        respond(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_request_picks_known_fields() {
        let config = json!({
            "display_name": "Usage Overview",
            "warehouse_id": "abc123",
            "unknown_field": "ignored"
        });
        let request = dashboard_request_from(&config);
        assert_eq!(request.display_name.as_deref(), Some("Usage Overview"));
        assert_eq!(request.warehouse_id.as_deref(), Some("abc123"));
        assert!(request.parent_path.is_none());
        assert!(request.serialized_dashboard.is_none());
    }

    #[test]
    fn dashboard_request_tolerates_non_object_config() {
        let request = dashboard_request_from(&json!("not an object"));
        assert!(request.display_name.is_none());
    }
}
