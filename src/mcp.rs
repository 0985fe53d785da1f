//! MCP protocol bridge.
//!
//! Adapts the [`ToolRouter`] to the Model Context Protocol over stdio:
//!
//! * **Tools** via `list_tools` / `call_tool`.
//! * **Resources** (the `design://` catalog) via `list_resources` / `read_resource`.
//!
//! stdout carries the protocol, so logging must go to stderr.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt};

use crate::config::Config;
use crate::error::DesignError;
use crate::router::ToolRouter;
use crate::tools::{ToolInfo, ToolName};

/// Bridges the router to MCP. Cloning is cheap; every session shares one router.
#[derive(Clone)]
pub struct McpBridge {
    router: Arc<ToolRouter>,
}

impl McpBridge {
    pub fn new(router: Arc<ToolRouter>) -> Self {
        Self { router }
    }

    fn to_mcp_tool(info: ToolInfo) -> Tool {
        let input_schema: Arc<serde_json::Map<String, serde_json::Value>> = match info.parameters
        {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        Tool {
            name: Cow::Owned(info.name),
            title: None,
            description: Some(Cow::Owned(info.description)),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(true)),
            execution: None,
            icons: None,
            meta: None,
        }
    }

    fn to_mcp_resource(info: crate::models::ResourceInfo) -> Resource {
        RawResource {
            uri: info.uri,
            name: info.name.clone(),
            title: Some(info.name),
            description: Some(info.description),
            mime_type: Some(info.mime_type),
            size: None,
            icons: None,
            meta: None,
        }
        .no_annotation()
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "design-harness".to_string(),
                title: Some("Design Harness".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Design system knowledge service. Use search_design_system to find tokens, \
                 components and patterns, find_color / convert_color / validate_contrast for \
                 color work, and generate_component for framework code. Guide sections are \
                 available as design:// resources."
                    .to_string(),
            ),
        }
    }

    // ── Tools ────────────────────────────────────────────────────────────

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .router
            .list_tools()
            .into_iter()
            .map(Self::to_mcp_tool)
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        let tool: ToolName = name.parse().ok()?;
        Some(Self::to_mcp_tool(ToolInfo::from(tool)))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let params = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let response = self.router.handle_tool_call(&request.name, &params);
        let text = serde_json::to_string_pretty(&response.to_json()).unwrap_or_default();
        if response.is_error() {
            Ok(CallToolResult::error(vec![Content::text(text)]))
        } else {
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
    }

    // ── Resources ────────────────────────────────────────────────────────

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources: Vec<Resource> = self
            .router
            .list_resources()
            .into_iter()
            .map(Self::to_mcp_resource)
            .collect();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match self.router.read_resource(&request.uri) {
            Ok(text) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::TextResourceContents {
                    uri: request.uri,
                    mime_type: Some("application/json".into()),
                    text,
                    meta: None,
                }],
            }),
            Err(e @ DesignError::NotFound { .. }) => {
                Err(McpError::resource_not_found(e.to_string(), Some(e.to_json())))
            }
            Err(e) => Err(McpError::invalid_params(e.to_string(), Some(e.to_json()))),
        }
    }
}

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn run_stdio(config: &Config) -> anyhow::Result<()> {
    let router = Arc::new(ToolRouter::from_config(config)?);
    crate::server::spawn_analytics_flush(&router, config);

    tracing::info!("MCP server ready on stdio");
    let service = McpBridge::new(router)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "MCP server error"))?;
    service.waiting().await?;
    Ok(())
}
