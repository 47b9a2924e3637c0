//! Governance tools: system-table queries, lineage, usage analytics and data
//! quality monitors.
//!
//! Caller-supplied strings are bound as named statement parameters (`:name`
//! markers); they never appear in the statement text. Numeric knobs (limits,
//! day windows) are typed integers and are inlined directly.

use chrono::NaiveDate;
use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::server::McpServer;
use crate::tools::{error_envelope, respond};
use dbx_core::models::sql::{StatementParameter, StatementRequest};
use dbx_core::{Error, Result};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct AuditLogsParams {
    /// Start date, YYYY-MM-DD
    pub start_date: String,
    /// End date, YYYY-MM-DD
    pub end_date: String,
    /// Optional service name to filter by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Optional action name to filter by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
    /// Maximum number of results (default: 1000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct TableLineageParams {
    /// Full table name (catalog.schema.table)
    pub table_name: String,
    /// Include upstream lineage (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<bool>,
    /// Include downstream lineage (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downstream: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ColumnLineageParams {
    /// Full table name (catalog.schema.table)
    pub table_name: String,
    /// Optional column name to trace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct TableUsageParams {
    /// Full table name (catalog.schema.table)
    pub table_name: String,
    /// Days to look back (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct WorkspaceObjectsParams {
    /// Object type to filter by (NOTEBOOK, DASHBOARD, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    /// Days to look back for created objects (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct PermissionsChangesParams {
    /// Optional user or service principal to filter by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
    /// Days to look back (default: 7)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ComputeUsageParams {
    /// Start date, YYYY-MM-DD
    pub start_date: String,
    /// End date, YYYY-MM-DD
    pub end_date: String,
    /// Optional cluster ID to filter by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct StorageUsageParams {
    /// Start date, YYYY-MM-DD
    pub start_date: String,
    /// End date, YYYY-MM-DD
    pub end_date: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ListMonitorsParams {
    /// Optional catalog name to filter monitors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct MonitorStatusParams {
    /// Full table name (catalog.schema.table)
    pub table_name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Query Builders
// ─────────────────────────────────────────────────────────────────────────────

fn validate_date(name: &str, value: &str) -> Result<()> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!("{name} must be YYYY-MM-DD, got '{value}'"))
    })?;
    Ok(())
}

fn audit_logs_query(
    service_name: Option<&str>,
    action_name: Option<&str>,
    limit: u32,
) -> (String, Vec<StatementParameter>) {
    let mut conditions = vec![
        "event_date >= :start_date".to_string(),
        "event_date <= :end_date".to_string(),
    ];
    let mut parameters = Vec::new();

    if let Some(service) = service_name {
        conditions.push("service_name = :service_name".to_string());
        parameters.push(StatementParameter::string("service_name", service));
    }
    if let Some(action) = action_name {
        conditions.push("action_name = :action_name".to_string());
        parameters.push(StatementParameter::string("action_name", action));
    }

    let statement = format!(
        "SELECT event_time, event_date, workspace_id, account_id, user_identity, \
         service_name, action_name, request_id, response, source_ip_address, user_agent \
         FROM system.access.audit \
         WHERE {} \
         ORDER BY event_time DESC \
         LIMIT {limit}",
        conditions.join(" AND ")
    );
    (statement, parameters)
}

fn table_lineage_query(upstream: bool, downstream: bool) -> (String, Vec<StatementParameter>) {
    let mut conditions = Vec::new();
    if upstream {
        conditions.push("target_table_full_name = :table_name");
    }
    if downstream {
        conditions.push("source_table_full_name = :table_name");
    }

    let statement = format!(
        "SELECT source_table_full_name, target_table_full_name, source_table_catalog, \
         source_table_schema, source_table_name, target_table_catalog, \
         target_table_schema, target_table_name, created_at, created_by \
         FROM system.access.table_lineage \
         WHERE {} \
         ORDER BY created_at DESC",
        conditions.join(" OR ")
    );
    (statement, Vec::new())
}

fn column_lineage_query(filter_column: bool) -> String {
    let mut conditions = vec![
        "(source_table_full_name = :table_name OR target_table_full_name = :table_name)"
            .to_string(),
    ];
    if filter_column {
        conditions.push(
            "(source_column_name = :column_name OR target_column_name = :column_name)".to_string(),
        );
    }

    format!(
        "SELECT source_table_full_name, source_column_name, target_table_full_name, \
         target_column_name, created_at, created_by \
         FROM system.access.column_lineage \
         WHERE {} \
         ORDER BY created_at DESC",
        conditions.join(" AND ")
    )
}

fn table_usage_query(days: u32) -> String {
    format!(
        "SELECT table_name, read_count, write_count, last_accessed, accessed_by_users FROM ( \
         SELECT :table_name as table_name, \
         COUNT(CASE WHEN action_name LIKE '%READ%' THEN 1 END) as read_count, \
         COUNT(CASE WHEN action_name LIKE '%WRITE%' THEN 1 END) as write_count, \
         MAX(event_time) as last_accessed, \
         COUNT(DISTINCT user_identity.email) as accessed_by_users \
         FROM system.access.audit \
         WHERE event_date >= DATE_SUB(CURRENT_DATE(), {days}) \
         AND (request_params.table_full_name = :table_name \
         OR request_params.table_full_name LIKE CONCAT('%', :table_name, '%')))"
    )
}

fn workspace_objects_query(filter_type: bool, created_days: u32) -> String {
    let mut conditions = vec![
        format!("event_date >= DATE_SUB(CURRENT_DATE(), {created_days})"),
        "action_name = 'create'".to_string(),
    ];
    if filter_type {
        conditions.push("request_params.object_type = :object_type".to_string());
    }

    format!(
        "SELECT event_time, user_identity.email as creator, request_params.object_type, \
         request_params.path, request_params.object_id, service_name \
         FROM system.access.audit \
         WHERE {} \
         ORDER BY event_time DESC",
        conditions.join(" AND ")
    )
}

fn permissions_changes_query(filter_principal: bool, days: u32) -> String {
    let mut conditions = vec![
        format!("event_date >= DATE_SUB(CURRENT_DATE(), {days})"),
        "action_name IN ('grant', 'revoke', 'update_permissions', 'set_permissions')".to_string(),
    ];
    if filter_principal {
        conditions.push(
            "(user_identity.email = :principal OR request_params.principal_name = :principal)"
                .to_string(),
        );
    }

    format!(
        "SELECT event_time, user_identity.email as changed_by, action_name, \
         request_params.principal_name as affected_principal, \
         request_params.permission_level, request_params.object_type, \
         request_params.object_id, service_name \
         FROM system.access.audit \
         WHERE {} \
         ORDER BY event_time DESC",
        conditions.join(" AND ")
    )
}

fn compute_usage_query(filter_cluster: bool) -> String {
    let mut conditions = vec![
        "usage_date >= :start_date".to_string(),
        "usage_date <= :end_date".to_string(),
    ];
    if filter_cluster {
        conditions.push("cluster_id = :cluster_id".to_string());
    }

    format!(
        "SELECT usage_date, cluster_id, cluster_name, node_type, usage_quantity, \
         usage_unit, list_price, usage_metadata \
         FROM system.billing.usage \
         WHERE {} \
         AND usage_metadata.cluster_id IS NOT NULL \
         ORDER BY usage_date DESC, usage_quantity DESC",
        conditions.join(" AND ")
    )
}

fn storage_usage_query() -> String {
    "SELECT usage_date, storage_type, SUM(usage_quantity) as total_storage_tb, \
     SUM(list_price) as total_cost_usd, COUNT(*) as usage_records \
     FROM system.billing.usage \
     WHERE usage_date >= :start_date \
     AND usage_date <= :end_date \
     AND usage_metadata.storage_type IS NOT NULL \
     GROUP BY usage_date, storage_type \
     ORDER BY usage_date DESC, total_storage_tb DESC"
        .to_string()
}

impl McpServer {
    /// Governance queries run on the configured default warehouse.
    fn governance_warehouse(&self) -> Result<String> {
        self.client
            .default_warehouse()
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Config(
                    "Governance queries need a SQL warehouse. Set DATABRICKS_SQL_WAREHOUSE_ID."
                        .into(),
                )
            })
    }

    async fn submit_governance_query(
        &self,
        statement: String,
        parameters: Vec<StatementParameter>,
    ) -> Result<(String, Option<String>)> {
        let request = StatementRequest {
            statement: statement.clone(),
            warehouse_id: self.governance_warehouse()?,
            catalog: None,
            schema: None,
            wait_timeout: None,
            parameters: if parameters.is_empty() {
                None
            } else {
                Some(parameters)
            },
        };
        let response = self.client.execute_statement(&request).await?;
        Ok((statement, response.statement_id))
    }
}

#[tool_router(router = governance_router, vis = "pub(crate)")]
impl McpServer {
    #[tool(description = "List system schemas available for governance queries.")]
    async fn list_system_schemas(&self) -> String {
        match self.client.list_schemas("system").await {
            Ok(list) => {
                let schemas = list.schemas.unwrap_or_default();
                let count = schemas.len();
                respond(Ok(json!({
                    "system_schemas": schemas,
                    "count": count,
                    "message": "System schemas retrieved successfully",
                })))
            }
            Err(e) => {
                // The system catalog may not be enabled; fall back to the
                // well-known schema set.
                warn!("could not list system schemas: {e}");
                respond(Ok(json!({
                    "system_schemas": [
                        { "name": "access", "description": "Audit logs and access information" },
                        { "name": "billing", "description": "Billing and usage information" },
                        { "name": "compute", "description": "Compute resource information" },
                        { "name": "storage", "description": "Storage usage information" },
                        { "name": "marketplace", "description": "Marketplace information" },
                        { "name": "information_schema", "description": "Information schema metadata" },
                    ],
                    "count": 6,
                    "message": "Standard system schemas listed",
                })))
            }
        }
    }

    #[tool(description = "Query audit logs from system.access.audit for a date range, optionally filtered by service or action.")]
    async fn query_audit_logs(&self, Parameters(params): Parameters<AuditLogsParams>) -> String {
        let result: Result<Value> = async {
            validate_date("start_date", &params.start_date)?;
            validate_date("end_date", &params.end_date)?;
            let limit = params.limit.unwrap_or(1000);

            let (statement, mut parameters) = audit_logs_query(
                params.service_name.as_deref(),
                params.action_name.as_deref(),
                limit,
            );
            parameters.push(StatementParameter::date("start_date", &params.start_date));
            parameters.push(StatementParameter::date("end_date", &params.end_date));

            let (query, statement_id) = self.submit_governance_query(statement, parameters).await?;
            Ok(json!({
                "query": query,
                "start_date": params.start_date,
                "end_date": params.end_date,
                "service_name": params.service_name,
                "action_name": params.action_name,
                "statement_id": statement_id,
                "message": "Audit log query executed successfully",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Query table lineage from system.access.table_lineage for a table.")]
    async fn query_table_lineage(
        &self,
        Parameters(params): Parameters<TableLineageParams>,
    ) -> String {
        let upstream = params.upstream.unwrap_or(true);
        let downstream = params.downstream.unwrap_or(true);
        if !upstream && !downstream {
            return error_envelope("Must specify upstream or downstream lineage");
        }

        let result: Result<Value> = async {
            let (statement, mut parameters) = table_lineage_query(upstream, downstream);
            parameters.push(StatementParameter::string("table_name", &params.table_name));

            let (query, statement_id) = self.submit_governance_query(statement, parameters).await?;
            Ok(json!({
                "table_name": params.table_name,
                "query": query,
                "upstream": upstream,
                "downstream": downstream,
                "statement_id": statement_id,
                "message": "Table lineage query executed successfully",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Query column lineage from system.access.column_lineage for a table, optionally for one column.")]
    async fn query_column_lineage(
        &self,
        Parameters(params): Parameters<ColumnLineageParams>,
    ) -> String {
        let result: Result<Value> = async {
            let statement = column_lineage_query(params.column_name.is_some());
            let mut parameters =
                vec![StatementParameter::string("table_name", &params.table_name)];
            if let Some(column) = &params.column_name {
                parameters.push(StatementParameter::string("column_name", column));
            }

            let (query, statement_id) = self.submit_governance_query(statement, parameters).await?;
            Ok(json!({
                "table_name": params.table_name,
                "column_name": params.column_name,
                "query": query,
                "statement_id": statement_id,
                "message": "Column lineage query executed successfully",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Query table usage patterns (reads, writes, last access) from audit logs.")]
    async fn query_table_usage(&self, Parameters(params): Parameters<TableUsageParams>) -> String {
        let result: Result<Value> = async {
            let days = params.days.unwrap_or(30);
            let statement = table_usage_query(days);
            let parameters = vec![StatementParameter::string("table_name", &params.table_name)];

            let (query, statement_id) = self.submit_governance_query(statement, parameters).await?;
            Ok(json!({
                "table_name": params.table_name,
                "days": days,
                "query": query,
                "statement_id": statement_id,
                "message": "Table usage query executed successfully",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Query recently created workspace objects from audit logs.")]
    async fn query_workspace_objects(
        &self,
        Parameters(params): Parameters<WorkspaceObjectsParams>,
    ) -> String {
        let result: Result<Value> = async {
            let created_days = params.created_days.unwrap_or(30);
            let statement = workspace_objects_query(params.object_type.is_some(), created_days);
            let mut parameters = Vec::new();
            if let Some(object_type) = &params.object_type {
                parameters.push(StatementParameter::string("object_type", object_type));
            }

            let (query, statement_id) = self.submit_governance_query(statement, parameters).await?;
            Ok(json!({
                "object_type": params.object_type,
                "created_days": created_days,
                "query": query,
                "statement_id": statement_id,
                "message": "Workspace objects query executed successfully",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Query recent permission changes (grants, revokes) from audit logs.")]
    async fn query_permissions_changes(
        &self,
        Parameters(params): Parameters<PermissionsChangesParams>,
    ) -> String {
        let result: Result<Value> = async {
            let days = params.days.unwrap_or(7);
            let statement = permissions_changes_query(params.principal.is_some(), days);
            let mut parameters = Vec::new();
            if let Some(principal) = &params.principal {
                parameters.push(StatementParameter::string("principal", principal));
            }

            let (query, statement_id) = self.submit_governance_query(statement, parameters).await?;
            Ok(json!({
                "principal": params.principal,
                "days": days,
                "query": query,
                "statement_id": statement_id,
                "message": "Permission changes query executed successfully",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Query compute usage from system.billing.usage for a date range.")]
    async fn query_compute_usage(
        &self,
        Parameters(params): Parameters<ComputeUsageParams>,
    ) -> String {
        let result: Result<Value> = async {
            validate_date("start_date", &params.start_date)?;
            validate_date("end_date", &params.end_date)?;

            let statement = compute_usage_query(params.cluster_id.is_some());
            let mut parameters = vec![
                StatementParameter::date("start_date", &params.start_date),
                StatementParameter::date("end_date", &params.end_date),
            ];
            if let Some(cluster_id) = &params.cluster_id {
                parameters.push(StatementParameter::string("cluster_id", cluster_id));
            }

            let (query, statement_id) = self.submit_governance_query(statement, parameters).await?;
            Ok(json!({
                "start_date": params.start_date,
                "end_date": params.end_date,
                "cluster_id": params.cluster_id,
                "query": query,
                "statement_id": statement_id,
                "message": "Compute usage query executed successfully",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Query storage usage totals from system.billing.usage for a date range.")]
    async fn query_storage_usage(
        &self,
        Parameters(params): Parameters<StorageUsageParams>,
    ) -> String {
        let result: Result<Value> = async {
            validate_date("start_date", &params.start_date)?;
            validate_date("end_date", &params.end_date)?;

            let statement = storage_usage_query();
            let parameters = vec![
                StatementParameter::date("start_date", &params.start_date),
                StatementParameter::date("end_date", &params.end_date),
            ];

            let (query, statement_id) = self.submit_governance_query(statement, parameters).await?;
            Ok(json!({
                "start_date": params.start_date,
                "end_date": params.end_date,
                "query": query,
                "statement_id": statement_id,
                "message": "Storage usage query executed successfully",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "List Unity Catalog data quality monitors, optionally filtered by catalog.")]
    async fn list_quality_monitors(
        &self,
        Parameters(params): Parameters<ListMonitorsParams>,
    ) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_quality_monitors().await?;
            let monitors: Vec<_> = list
                .monitors
                .unwrap_or_default()
                .into_iter()
                .filter(|m| match (&params.catalog_name, &m.table_name) {
                    (Some(catalog), Some(table)) => table.starts_with(&format!("{catalog}.")),
                    (Some(_), None) => false,
                    (None, _) => true,
                })
                .collect();
            let count = monitors.len();
            Ok(json!({
                "catalog_name": params.catalog_name,
                "monitors": monitors,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get the status of a table's data quality monitor.")]
    async fn get_quality_monitor_status(
        &self,
        Parameters(params): Parameters<MonitorStatusParams>,
    ) -> String {
        let result: Result<Value> = async {
            let monitor = self.client.get_quality_monitor(&params.table_name).await?;
            Ok(json!({ "monitor": monitor }))
        }
        .await;
        respond(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_audit_query_has_no_stray_clauses() {
        let (statement, parameters) = audit_logs_query(None, None, 1000);
        assert!(!statement.contains("service_name ="));
        assert!(!statement.contains("action_name ="));
        assert!(statement.contains("LIMIT 1000"));
        assert!(parameters.is_empty());
    }

    #[test]
    fn filtered_audit_query_binds_values() {
        let (statement, parameters) = audit_logs_query(Some("jobs"), Some("create"), 50);
        assert!(statement.contains("service_name = :service_name"));
        assert!(statement.contains("action_name = :action_name"));
        // Values live in the parameter list, never in the statement text.
        assert!(!statement.contains("jobs"));
        assert!(!statement.contains("'create'"));
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0], StatementParameter::string("service_name", "jobs"));
    }

    #[test]
    fn hostile_input_stays_out_of_statement_text() {
        let hostile = "x'; DROP TABLE users; --";
        let (statement, parameters) = audit_logs_query(Some(hostile), None, 10);
        assert!(!statement.contains("DROP TABLE"));
        assert_eq!(parameters[0].value, hostile);
    }

    #[test]
    fn lineage_query_directions() {
        let (both, _) = table_lineage_query(true, true);
        assert!(both.contains("target_table_full_name = :table_name"));
        assert!(both.contains("source_table_full_name = :table_name"));
        assert!(both.contains(" OR "));

        let (up_only, _) = table_lineage_query(true, false);
        assert!(up_only.contains("target_table_full_name"));
        assert!(!up_only.contains("source_table_full_name = :table_name OR"));
    }

    #[test]
    fn column_lineage_clause_is_optional() {
        let without = column_lineage_query(false);
        assert!(!without.contains(":column_name"));
        let with = column_lineage_query(true);
        assert!(with.contains("source_column_name = :column_name"));
    }

    #[test]
    fn table_usage_inlines_typed_days_only() {
        let statement = table_usage_query(30);
        assert!(statement.contains("DATE_SUB(CURRENT_DATE(), 30)"));
        assert!(statement.contains(":table_name"));
        assert!(statement.contains("CONCAT('%', :table_name, '%')"));
    }

    #[test]
    fn permissions_query_binds_principal() {
        let without = permissions_changes_query(false, 7);
        assert!(!without.contains(":principal"));
        let with = permissions_changes_query(true, 7);
        assert!(with.contains("user_identity.email = :principal"));
    }

    #[test]
    fn compute_usage_optional_cluster_filter() {
        let without = compute_usage_query(false);
        assert!(!without.contains(":cluster_id"));
        let with = compute_usage_query(true);
        assert!(with.contains("cluster_id = :cluster_id"));
    }

    #[test]
    fn date_validation() {
        assert!(validate_date("start_date", "2024-01-31").is_ok());
        assert!(validate_date("start_date", "2024-13-01").is_err());
        assert!(validate_date("start_date", "not-a-date").is_err());
        let err = validate_date("end_date", "01/02/2024").unwrap_err();
        assert!(err.to_string().contains("end_date"));
    }
}
