//! SQL statement execution, warehouses and DBFS.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /api/2.0/sql/statements`
#[derive(Debug, Clone, Serialize)]
pub struct StatementRequest {
    pub statement: String,
    pub warehouse_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_timeout: Option<String>,
    /// Named parameters bound server-side; the statement text references
    /// them as `:name` markers. Caller-supplied values never appear in the
    /// statement itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<StatementParameter>>,
}

/// One bound statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementParameter {
    pub name: String,
    pub value: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
}

impl StatementParameter {
    pub fn string(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            param_type: Some("STRING".to_string()),
        }
    }

    pub fn date(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            param_type: Some("DATE".to_string()),
        }
    }
}

/// Response from `POST /api/2.0/sql/statements`
#[derive(Debug, Clone, Deserialize)]
pub struct StatementResponse {
    pub statement_id: Option<String>,
    pub status: Option<StatementStatus>,
    pub manifest: Option<ResultManifest>,
    pub result: Option<ResultData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementStatus {
    pub state: Option<String>,
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultManifest {
    pub schema: Option<ResultSchema>,
    pub total_row_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultSchema {
    pub columns: Option<Vec<ResultColumn>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultColumn {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub type_text: Option<String>,
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultData {
    pub data_array: Option<Vec<Vec<Option<String>>>>,
    pub row_count: Option<i64>,
}

/// Response from `GET /api/2.0/sql/warehouses`
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseList {
    pub warehouses: Option<Vec<Warehouse>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: Option<String>,
    pub name: Option<String>,
    pub state: Option<String>,
    pub cluster_size: Option<String>,
    pub warehouse_type: Option<String>,
    pub creator_name: Option<String>,
    pub auto_stop_mins: Option<i64>,
}

/// Response from `GET /api/2.0/dbfs/list`
#[derive(Debug, Clone, Deserialize)]
pub struct DbfsList {
    pub files: Option<Vec<FileInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: Option<String>,
    pub is_dir: Option<bool>,
    pub file_size: Option<i64>,
    pub modification_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_request_omits_unset_optionals() {
        let req = StatementRequest {
            statement: "SELECT 1".into(),
            warehouse_id: "wh-1".into(),
            catalog: None,
            schema: None,
            wait_timeout: Some("30s".into()),
            parameters: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        let obj = v.as_object().unwrap();
        assert!(!obj.contains_key("catalog"));
        assert!(!obj.contains_key("schema"));
        assert!(!obj.contains_key("parameters"));
        assert_eq!(obj["wait_timeout"], "30s");
    }

    #[test]
    fn parameter_serializes_type_tag() {
        let p = StatementParameter::date("start_date", "2024-01-01");
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["name"], "start_date");
        assert_eq!(v["type"], "DATE");
        assert_eq!(v["value"], "2024-01-01");
    }
}
