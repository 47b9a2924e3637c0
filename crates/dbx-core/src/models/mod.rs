//! Request/response shapes for the Databricks REST API.
//!
//! Response structs keep every declared field as `Option<T>` and serialize
//! unset fields as explicit `null`, so consumers always see a stable key
//! set. Request structs do the opposite: unset optionals are omitted from
//! the wire entirely, preserving API-side defaulting.

pub mod catalog;
pub mod compute;
pub mod dashboards;
pub mod mlflow;
pub mod security;
pub mod sql;
pub mod workspace;
