//! dbx-server - Databricks workspace MCP server.
//!
//! Exposes workspace management tools over the MCP stdio transport.

use rmcp::{transport::stdio, ServiceExt};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod server;
mod tools;

use server::McpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging goes to stderr; stdout carries the MCP stream.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("dbx_server=info".parse()?))
        .init();

    info!("dbx-server v{}", env!("CARGO_PKG_VERSION"));

    // Resolve credentials once; everything downstream gets the client injected.
    let config = dbx_core::Config::from_env()?;
    info!("Workspace host: {}", config.host);
    if !config.has_warehouse() {
        info!("No default SQL warehouse configured; SQL tools require warehouse_id");
    }

    let client = dbx_core::WorkspaceClient::new(config)?;

    let service = McpServer::new(client).serve(stdio()).await?;
    service.waiting().await?;

    info!("Shutting down...");
    Ok(())
}
