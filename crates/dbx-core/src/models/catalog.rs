//! Unity Catalog discovery and data quality monitors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response from `GET /api/2.1/unity-catalog/catalogs`
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogList {
    pub catalogs: Option<Vec<CatalogInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub name: Option<String>,
    pub catalog_type: Option<String>,
    pub comment: Option<String>,
    pub metastore_id: Option<String>,
    pub owner: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Response from `GET /api/2.1/unity-catalog/schemas`
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaList {
    pub schemas: Option<Vec<SchemaInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub name: Option<String>,
    pub catalog_name: Option<String>,
    pub full_name: Option<String>,
    pub comment: Option<String>,
    pub owner: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Response from `GET /api/2.1/unity-catalog/tables`
#[derive(Debug, Clone, Deserialize)]
pub struct TableList {
    pub tables: Option<Vec<TableInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_type: Option<String>,
    pub data_source_format: Option<String>,
    pub comment: Option<String>,
    pub owner: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub storage_location: Option<String>,
    pub storage_credential_name: Option<String>,
    pub columns: Option<Vec<ColumnSpec>>,
    pub properties: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub type_text: Option<String>,
    pub comment: Option<String>,
    pub nullable: Option<bool>,
    pub partition_index: Option<i64>,
}

/// Response from `GET /api/2.1/quality-monitors`
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorList {
    pub monitors: Option<Vec<MonitorInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub table_name: Option<String>,
    pub monitor_version: Option<String>,
    pub status: Option<String>,
    pub profile_type: Option<Value>,
    pub output_schema_name: Option<String>,
    pub created_by: Option<String>,
    pub created_time: Option<i64>,
    pub updated_by: Option<String>,
    pub updated_time: Option<i64>,
    pub drift_metrics_table_name: Option<String>,
    pub profile_metrics_table_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_columns_round_trip() {
        let t: TableInfo = serde_json::from_value(json!({
            "name": "orders",
            "full_name": "main.sales.orders",
            "table_type": "MANAGED",
            "columns": [
                {"name": "id", "type_name": "LONG", "partition_index": 0},
                {"name": "amount", "type_name": "DECIMAL", "nullable": true}
            ]
        }))
        .unwrap();
        let cols = t.columns.as_ref().unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].partition_index, Some(0));
        assert!(cols[1].partition_index.is_none());
    }
}
