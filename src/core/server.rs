//! MCP Server implementation and lifecycle management.
//!
//! The server owns the toolset registry and answers `tools/list` and
//! `tools/call` from it. Whatever the registry currently exposes is what
//! clients see, so enabling a toolset at runtime needs no change here.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use super::error::Result;
use super::github::{RestClient, SharedClient};
use crate::domains::tools::{ToolRequest, ToolsetGroup, build_registry};

const INSTRUCTIONS: &str = "The GitHub MCP server exposes GitHub's API as tools, grouped into toolsets. \
Use get_me to learn who you are acting as. When the dynamic toolset is available, call \
list_available_toolsets and enable_toolset to reach tools that are not listed yet.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct GithubMcpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Every toolset and its enablement state.
    registry: Arc<ToolsetGroup>,
}

impl GithubMcpServer {
    /// Create a server talking to the configured GitHub host.
    pub fn new(config: Config) -> Result<Self> {
        let token = config.github.require_token()?;
        let client: SharedClient = Arc::new(RestClient::new(token, &config.github.host)?);
        Self::with_client(config, client)
    }

    /// Create a server on top of an existing GitHub client.
    pub fn with_client(config: Config, client: SharedClient) -> Result<Self> {
        let registry = build_registry(
            &client,
            config.github.read_only,
            config.github.dynamic_toolsets,
            config.github.toolsets.as_deref(),
        )?;

        info!(
            tools = registry.enabled_tools().len(),
            read_only = config.github.read_only,
            "Server ready"
        );

        Ok(Self {
            config: Arc::new(config),
            registry,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ToolsetGroup> {
        &self.registry
    }

    /// Tools currently exposed to clients.
    pub fn tools(&self) -> Vec<Tool> {
        self.registry
            .enabled_tools()
            .into_iter()
            .map(|descriptor| descriptor.tool().clone())
            .collect()
    }

    /// Invoke an exposed tool.
    ///
    /// An unknown or disabled tool is a protocol error. Everything that goes
    /// wrong inside the tool comes back as an error result instead.
    pub async fn dispatch_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let Some(descriptor) = self.registry.find_enabled_tool(name) else {
            warn!(tool = name, "Call to unavailable tool");
            return Err(McpError::invalid_params(format!("tool not found: {name}"), None));
        };
        Ok(descriptor.call(ToolRequest::new(name, arguments)).await)
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List the exposed tools as JSON (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn list_tools_json(&self) -> Vec<serde_json::Value> {
        self.tools()
            .iter()
            .filter_map(|tool| serde_json::to_value(tool).ok())
            .collect()
    }

    /// Call a tool with raw JSON arguments (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool_json(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> std::result::Result<serde_json::Value, String> {
        use serde_json::Value;

        let arguments = match arguments {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => return Err("arguments must be an object".to_string()),
        };
        let result = self
            .dispatch_tool(name, arguments)
            .await
            .map_err(|e| e.message.to_string())?;
        serde_json::to_value(result).map_err(|e| e.to_string())
    }
}

impl ServerHandler for GithubMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_tool_list_changed()
                .build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        let tools = self.tools();
        info!("Listing {} tools", tools.len());
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let before = self.registry.version();
        let result = self.dispatch_tool(&request.name, request.arguments).await;

        if self.registry.version() != before {
            info!("Toolset selection changed; notifying client");
            if let Err(e) = context.peer.notify_tool_list_changed().await {
                warn!("Failed to send tools/list_changed: {}", e);
            }
        }
        result
    }
}
