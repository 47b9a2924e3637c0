//! Unity Catalog discovery and data quality monitors.

use super::WorkspaceClient;
use crate::error::Result;
use crate::models::catalog::*;

impl WorkspaceClient {
    pub async fn list_catalogs(&self) -> Result<CatalogList> {
        self.get("/api/2.1/unity-catalog/catalogs").await
    }

    pub async fn get_catalog(&self, catalog_name: &str) -> Result<CatalogInfo> {
        self.get(&format!("/api/2.1/unity-catalog/catalogs/{catalog_name}"))
            .await
    }

    pub async fn list_schemas(&self, catalog_name: &str) -> Result<SchemaList> {
        self.get_query(
            "/api/2.1/unity-catalog/schemas",
            &[("catalog_name", catalog_name.into())],
        )
        .await
    }

    pub async fn get_schema(&self, full_name: &str) -> Result<SchemaInfo> {
        self.get(&format!("/api/2.1/unity-catalog/schemas/{full_name}"))
            .await
    }

    pub async fn list_tables(&self, catalog_name: &str, schema_name: &str) -> Result<TableList> {
        self.get_query(
            "/api/2.1/unity-catalog/tables",
            &[
                ("catalog_name", catalog_name.into()),
                ("schema_name", schema_name.into()),
            ],
        )
        .await
    }

    /// Fetch a table by its three-level name (`catalog.schema.table`).
    pub async fn get_table(&self, full_name: &str) -> Result<TableInfo> {
        self.get(&format!("/api/2.1/unity-catalog/tables/{full_name}"))
            .await
    }

    pub async fn list_quality_monitors(&self) -> Result<MonitorList> {
        self.get("/api/2.1/quality-monitors").await
    }

    pub async fn get_quality_monitor(&self, table_name: &str) -> Result<MonitorInfo> {
        self.get(&format!("/api/2.1/unity-catalog/tables/{table_name}/monitor"))
            .await
    }
}
