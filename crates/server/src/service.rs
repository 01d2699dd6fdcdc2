//! MCP surface over the Mailgun tool registry.

use mailgun_openapi_tools::error::MailgunToolsError;
use mailgun_openapi_tools::runtime::MailgunToolSource;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData as McpError, Implementation,
    ListToolsResult, PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;
use std::sync::Arc;

/// Serves the registered Mailgun tools to one connected MCP client.
///
/// The handler is cheap to clone: every instance shares the same immutable tool
/// registry, so the HTTP transport can create one per session.
#[derive(Clone)]
pub struct MailgunMcpServer {
    source: Arc<MailgunToolSource>,
}

impl MailgunMcpServer {
    pub fn new(source: Arc<MailgunToolSource>) -> Self {
        Self { source }
    }
}

impl ServerHandler for MailgunMcpServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.source.list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request.arguments.map_or(Value::Null, Value::Object);
        self.source
            .call_tool(&request.name, arguments)
            .await
            .map_err(|e| match e {
                MailgunToolsError::Runtime(_) | MailgunToolsError::InvalidArguments(_) => {
                    McpError::invalid_params(e.to_string(), None)
                }
                other => McpError::internal_error(other.to_string(), None),
            })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mailgun-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Mailgun MCP Server".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Tools mirror the Mailgun HTTP API. Most tools take a 'domain_name' \
                 argument naming the sending domain; listing tools accept 'limit' and \
                 similar paging arguments. Results carry the raw Mailgun JSON response."
                    .to_string(),
            ),
        }
    }
}
