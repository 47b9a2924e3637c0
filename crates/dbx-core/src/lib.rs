//! dbx-core - Core library for the Databricks MCP server
//!
//! This crate provides everything below the MCP layer:
//!
//! - **config**: environment-resolved workspace configuration
//! - **error**: error taxonomy with HTTP status classification
//! - **client**: `WorkspaceClient`, a thin REST client over the Databricks API
//! - **models**: request/response shapes per API domain

pub mod client;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use client::WorkspaceClient;
pub use config::Config;
pub use error::{Error, Result};
