//! MCP server implementation.
//!
//! Tools are grouped into one router per subject area (core, compute,
//! governance, mlflow, security, workspace, dashboards) and combined into a
//! single dispatch table here.

use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext},
    model::{
        CallToolRequestParam, CallToolResult, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    ErrorData, RoleServer, ServerHandler,
};
use std::sync::Arc;
use tracing::debug;

use dbx_core::WorkspaceClient;

/// Databricks workspace MCP server.
///
/// Holds the injected workspace client; every tool handler goes through it.
#[derive(Clone)]
pub struct McpServer {
    pub(crate) client: Arc<WorkspaceClient>,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(client: WorkspaceClient) -> Self {
        Self {
            client: Arc::new(client),
            tool_router: Self::core_router()
                + Self::compute_router()
                + Self::governance_router()
                + Self::mlflow_router()
                + Self::security_router()
                + Self::workspace_router()
                + Self::dashboards_router(),
        }
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Databricks workspace MCP server - SQL, Unity Catalog, clusters, MLflow, \
                 governance, security and workspace administration tools."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        async move {
            let tools = self.tool_router.list_all();
            debug!("list_tools: returning {} tools", tools.len());
            Ok(ListToolsResult {
                tools,
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: rmcp::service::RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        debug!("Calling tool: {}", request.name);
        async move {
            let tool_context = ToolCallContext::new(self, request, context);
            self.tool_router.call(tool_context).await
        }
    }
}
