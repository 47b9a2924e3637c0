//! Core tools: health, SQL execution, warehouses, DBFS and Unity Catalog
//! discovery.

use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::server::McpServer;
use crate::tools::{error_envelope, respond};
use dbx_core::models::sql::StatementRequest;
use dbx_core::Result;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ExecuteDbsqlParams {
    /// SQL query to execute
    pub query: String,
    /// SQL warehouse ID (optional, falls back to the configured default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,
    /// Catalog to resolve unqualified names against (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Schema to resolve unqualified names against (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Maximum number of rows to return (default: 100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ListDbfsFilesParams {
    /// DBFS path to list (default: "/")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct DescribeCatalogParams {
    /// Name of the catalog to describe
    pub catalog_name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct DescribeSchemaParams {
    /// Name of the catalog
    pub catalog_name: String,
    /// Name of the schema
    pub schema_name: String,
    /// Whether to include column details for each table (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_columns: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct DescribeTableParams {
    /// Full table name in catalog.schema.table format
    pub table_name: String,
    /// Whether to include lineage information (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_lineage: Option<bool>,
}

#[tool_router(router = core_router, vis = "pub(crate)")]
impl McpServer {
    /// Health probe for the server and its workspace connection.
    #[tool(description = "Check the health of the MCP server and Databricks connection.")]
    async fn health(&self) -> String {
        json!({
            "status": "success",
            "service": "dbx-mcp",
            "host": self.client.host(),
            "warehouse_configured": self.client.default_warehouse().is_some(),
        })
        .to_string()
    }

    #[tool(description = "Execute a SQL query on a Databricks SQL warehouse and return the rows.")]
    async fn execute_dbsql(&self, Parameters(params): Parameters<ExecuteDbsqlParams>) -> String {
        let warehouse_id = match params
            .warehouse_id
            .as_deref()
            .or_else(|| self.client.default_warehouse())
        {
            Some(id) => id.to_string(),
            None => {
                return error_envelope(
                    "No SQL warehouse ID provided. Set DATABRICKS_SQL_WAREHOUSE_ID or pass warehouse_id.",
                );
            }
        };

        let limit = params.limit.unwrap_or(100);
        debug!("execute_dbsql on warehouse {warehouse_id}");

        let result: Result<Value> = async {
            let request = StatementRequest {
                statement: params.query.clone(),
                warehouse_id,
                catalog: params.catalog.clone(),
                schema: params.schema.clone(),
                wait_timeout: Some("30s".into()),
                parameters: None,
            };
            let response = self.client.execute_statement(&request).await?;

            let columns: Vec<String> = response
                .manifest
                .as_ref()
                .and_then(|m| m.schema.as_ref())
                .and_then(|s| s.columns.as_ref())
                .map(|cols| {
                    cols.iter()
                        .map(|c| c.name.clone().unwrap_or_default())
                        .collect()
                })
                .unwrap_or_default();

            let data_array = response.result.as_ref().and_then(|r| r.data_array.as_ref());
            match data_array {
                Some(rows) if !rows.is_empty() => {
                    let rows: Vec<Value> = rows
                        .iter()
                        .take(limit)
                        .map(|row| {
                            let mut obj = serde_json::Map::new();
                            for (i, col) in columns.iter().enumerate() {
                                let cell = row.get(i).cloned().flatten();
                                obj.insert(col.clone(), json!(cell));
                            }
                            Value::Object(obj)
                        })
                        .collect();
                    let row_count = rows.len();
                    Ok(json!({
                        "data": { "columns": columns, "rows": rows },
                        "row_count": row_count,
                    }))
                }
                _ => Ok(json!({
                    "data": { "message": "Query executed successfully with no results" },
                    "row_count": 0,
                })),
            }
        }
        .await;
        respond(result)
    }

    #[tool(description = "List all SQL warehouses in the workspace with their state and size.")]
    async fn list_warehouses(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_warehouses().await?;
            let warehouses = list.warehouses.unwrap_or_default();
            let count = warehouses.len();
            Ok(json!({
                "warehouses": warehouses,
                "count": count,
                "message": format!("Found {count} SQL warehouse(s)"),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "List files and directories in DBFS at the given path.")]
    async fn list_dbfs_files(&self, Parameters(params): Parameters<ListDbfsFilesParams>) -> String {
        let path = params.path.unwrap_or_else(|| "/".to_string());
        let result: Result<Value> = async {
            let list = self.client.list_dbfs(&path).await?;
            let files = list.files.unwrap_or_default();
            let count = files.len();
            let message = format!("Listed {count} item(s) in {path}");
            Ok(json!({
                "path": path,
                "files": files,
                "count": count,
                "message": message,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "List all Unity Catalog catalogs. Starting point for data discovery.")]
    async fn list_uc_catalogs(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_catalogs().await?;
            let catalogs = list.catalogs.unwrap_or_default();
            let count = catalogs.len();
            Ok(json!({
                "catalogs": catalogs,
                "count": count,
                "message": format!("Found {count} catalog(s)"),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Describe a Unity Catalog catalog, including its schemas.")]
    async fn describe_uc_catalog(
        &self,
        Parameters(params): Parameters<DescribeCatalogParams>,
    ) -> String {
        let catalog = match self.client.get_catalog(&params.catalog_name).await {
            Ok(c) => c,
            Err(e) => {
                return error_envelope(&format!(
                    "Catalog \"{}\" not found or access denied: {e}",
                    params.catalog_name
                ));
            }
        };

        // Schema listing is best-effort; a catalog with no visible schemas is
        // still a valid answer.
        let schemas = match self.client.list_schemas(&params.catalog_name).await {
            Ok(list) => list.schemas.unwrap_or_default(),
            Err(e) => {
                warn!("could not list schemas for {}: {e}", params.catalog_name);
                Vec::new()
            }
        };

        let schema_count = schemas.len();
        let message = format!(
            "Catalog \"{}\" contains {schema_count} schema(s)",
            params.catalog_name
        );
        respond(Ok(json!({
            "catalog": catalog,
            "schemas": schemas,
            "schema_count": schema_count,
            "message": message,
        })))
    }

    #[tool(description = "Describe a schema within a catalog, listing its tables and optionally their columns.")]
    async fn describe_uc_schema(
        &self,
        Parameters(params): Parameters<DescribeSchemaParams>,
    ) -> String {
        let include_columns = params.include_columns.unwrap_or(false);
        let full_schema_name = format!("{}.{}", params.catalog_name, params.schema_name);

        let schema = match self.client.get_schema(&full_schema_name).await {
            Ok(s) => s,
            Err(e) => {
                return error_envelope(&format!(
                    "Schema \"{full_schema_name}\" not found or access denied: {e}"
                ));
            }
        };

        let mut tables: Vec<Value> = Vec::new();
        match self
            .client
            .list_tables(&params.catalog_name, &params.schema_name)
            .await
        {
            Ok(list) => {
                for table in list.tables.unwrap_or_default() {
                    let full_name = table
                        .full_name
                        .clone()
                        .unwrap_or_else(|| full_schema_name.clone());
                    let mut entry = serde_json::to_value(&table).unwrap_or_else(|_| json!({}));

                    if include_columns {
                        match self.client.get_table(&full_name).await {
                            Ok(details) => {
                                let columns = details.columns.unwrap_or_default();
                                entry["column_count"] = json!(columns.len());
                                entry["columns"] = json!(columns);
                            }
                            Err(e) => {
                                warn!("could not get columns for {full_name}: {e}");
                                entry["columns_error"] = json!(e.to_string());
                            }
                        }
                    }
                    tables.push(entry);
                }
            }
            Err(e) => warn!("could not list tables for {full_schema_name}: {e}"),
        }

        let table_count = tables.len();
        let message = format!("Schema \"{full_schema_name}\" contains {table_count} table(s)");
        respond(Ok(json!({
            "schema": schema,
            "tables": tables,
            "table_count": table_count,
            "include_columns": include_columns,
            "message": message,
        })))
    }

    #[tool(description = "Describe a table's structure and metadata. Takes a catalog.schema.table name.")]
    async fn describe_uc_table(
        &self,
        Parameters(params): Parameters<DescribeTableParams>,
    ) -> String {
        let include_lineage = params.include_lineage.unwrap_or(false);

        let parts: Vec<&str> = params.table_name.split('.').collect();
        if parts.len() != 3 {
            return error_envelope(&format!(
                "Invalid table name format. Expected \"catalog.schema.table\", got \"{}\"",
                params.table_name
            ));
        }

        let table = match self.client.get_table(&params.table_name).await {
            Ok(t) => t,
            Err(e) => {
                return error_envelope(&format!(
                    "Table \"{}\" not found or access denied: {e}",
                    params.table_name
                ));
            }
        };

        let columns = table.columns.clone().unwrap_or_default();
        let partition_columns: Vec<_> = columns
            .iter()
            .filter(|c| c.partition_index.is_some())
            .cloned()
            .collect();

        let column_count = columns.len();
        let partition_count = partition_columns.len();

        let mut table_info = serde_json::to_value(&table).unwrap_or_else(|_| json!({}));
        table_info["column_count"] = json!(column_count);
        table_info["partition_columns"] = json!(partition_columns);
        table_info["partition_count"] = json!(partition_count);

        let mut result = json!({
            "table": table_info,
            "include_lineage": include_lineage,
            "message": format!(
                "Table \"{}\" has {column_count} column(s) and {partition_count} partition column(s)",
                params.table_name,
            ),
        });
        if include_lineage {
            // Full lineage lives in the system tables; point callers at the
            // dedicated governance tools instead of duplicating those queries.
            result["lineage"] = json!({
                "upstream_tables": [],
                "downstream_tables": [],
                "note": "Use query_table_lineage / query_column_lineage for lineage details",
            });
        }

        respond(Ok(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_params_omit_unset_optionals() {
        let p = ExecuteDbsqlParams {
            query: "SELECT 1".into(),
            warehouse_id: None,
            catalog: None,
            schema: None,
            limit: None,
        };
        let v = serde_json::to_value(&p).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["query"], "SELECT 1");
    }

    #[test]
    fn table_name_split_validation() {
        let parts: Vec<&str> = "main.sales.orders".split('.').collect();
        assert_eq!(parts.len(), 3);
        let parts: Vec<&str> = "sales.orders".split('.').collect();
        assert_ne!(parts.len(), 3);
    }
}
