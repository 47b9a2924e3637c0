//! Exercises the crate surface the server binary depends on: config
//! normalization, error classification and statement request shaping.

use dbx_core::models::sql::{StatementParameter, StatementRequest};
use dbx_core::{Config, Error, WorkspaceClient};

#[test]
fn client_is_constructed_from_injected_config() {
    let config = Config::new(
        "https://adb-1.2.azuredatabricks.net/".into(),
        "dapi123".into(),
        Some("wh-1".into()),
    )
    .unwrap();
    let client = WorkspaceClient::new(config).unwrap();
    assert_eq!(client.host(), "https://adb-1.2.azuredatabricks.net");
    assert_eq!(client.default_warehouse(), Some("wh-1"));
}

#[test]
fn config_validation_surfaces_as_config_errors() {
    let err = Config::new("ftp://example.com".into(), "dapi123".into(), None).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn not_found_is_distinguishable_from_other_api_errors() {
    let missing = Error::from_response(
        404,
        "/api/2.1/unity-catalog/tables/main.s.t",
        None,
        "table does not exist".into(),
    );
    let denied = Error::from_response(403, "/api/2.0/secrets/list", None, "denied".into());
    assert!(missing.is_not_found());
    assert!(!denied.is_not_found());
}

#[test]
fn parameterized_statement_keeps_values_out_of_sql_text() {
    let req = StatementRequest {
        statement: "SELECT * FROM system.access.audit WHERE service_name = :service".into(),
        warehouse_id: "wh-1".into(),
        catalog: None,
        schema: None,
        wait_timeout: Some("30s".into()),
        parameters: Some(vec![StatementParameter::string(
            "service",
            "jobs'; DROP TABLE audit; --",
        )]),
    };
    let v = serde_json::to_value(&req).unwrap();
    assert!(!v["statement"].as_str().unwrap().contains("DROP TABLE"));
    assert_eq!(v["parameters"][0]["name"], "service");
    assert_eq!(v["parameters"][0]["value"], "jobs'; DROP TABLE audit; --");
}
