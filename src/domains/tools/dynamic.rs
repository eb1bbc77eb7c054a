//! Dynamic toolset discovery.
//!
//! When dynamic mode is on, the registry carries a pinned toolset named
//! `dynamic`. Its tools let a client inspect the catalog and switch on more
//! toolsets mid-session. The tools hold a weak reference back to the
//! registry that owns them.

use std::sync::Weak;

use schemars::JsonSchema;
use serde::Serialize;
use tracing::info;

use super::error::{ToolError, ToolResult};
use super::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use super::params::{NoParams, ParamResult, ToolRequest, required_param};
use super::registry::ToolsetGroup;
use super::toolset::Toolset;

/// Name of the dynamic toolset.
pub const DYNAMIC_TOOLSET: &str = "dynamic";

/// Build the pinned `dynamic` toolset for `group`.
pub fn dynamic_toolset(group: Weak<ToolsetGroup>) -> Toolset {
    Toolset::new(
        DYNAMIC_TOOLSET,
        "Discover GitHub MCP tools that can help achieve tasks by enabling additional sets of tools",
    )
    .with_tool(ToolDescriptor::from_definition::<ListAvailableToolsetsTool>(group.clone()))
    .with_tool(ToolDescriptor::from_definition::<GetToolsetToolsTool>(group.clone()))
    .with_tool(ToolDescriptor::from_definition::<EnableToolsetTool>(group))
    .pinned()
}

fn upgrade(group: &Weak<ToolsetGroup>) -> ToolResult<std::sync::Arc<ToolsetGroup>> {
    group
        .upgrade()
        .ok_or_else(|| ToolError::internal("toolset registry is no longer available"))
}

fn not_found(name: &str) -> ToolError {
    ToolError::not_found(format!("Toolset {name} not found"))
}

// ============================================================================
// Parameters and payloads
// ============================================================================

/// Parameters naming a single toolset.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ToolsetNameParams {
    /// The name of the toolset
    pub toolset: String,
}

impl ToolsetNameParams {
    fn extract(request: &ToolRequest) -> ParamResult<Self> {
        Ok(Self {
            toolset: required_param(request, "toolset")?,
        })
    }
}

/// A toolset as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolsetSummary {
    pub name: String,
    pub description: String,
    pub can_enable: bool,
    pub currently_enabled: bool,
}

/// A tool as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
    pub read_only: bool,
}

/// Outcome of an enable request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnableOutcome {
    pub toolset: String,
    pub enabled: bool,
    pub message: String,
}

// ============================================================================
// Tools
// ============================================================================

/// Lists every toolset except `dynamic` with its current state.
pub struct ListAvailableToolsetsTool;

impl ToolDefinition for ListAvailableToolsetsTool {
    const NAME: &'static str = "list_available_toolsets";
    const TITLE: &'static str = "List available toolsets";
    const DESCRIPTION: &'static str = "List all available toolsets this GitHub MCP server can offer, providing the enabled status of each. Use this when a task could be achieved with a GitHub tool and the currently available tools aren't enough. Call get_toolset_tools with these toolset names to discover specific tools you can call";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = NoParams;
    type Context = Weak<ToolsetGroup>;
    type Output = Vec<ToolsetSummary>;

    fn extract(_request: &ToolRequest) -> ParamResult<NoParams> {
        Ok(NoParams {})
    }

    async fn execute(group: &Weak<ToolsetGroup>, _params: NoParams) -> ToolResult<Vec<ToolsetSummary>> {
        let group = upgrade(group)?;
        Ok(group
            .toolsets()
            .iter()
            .filter(|t| t.name() != DYNAMIC_TOOLSET)
            .map(|t| ToolsetSummary {
                name: t.name().to_string(),
                description: t.description().to_string(),
                can_enable: true,
                currently_enabled: t.is_enabled(),
            })
            .collect())
    }
}

/// Lists the tools a toolset exposes when enabled.
pub struct GetToolsetToolsTool;

impl ToolDefinition for GetToolsetToolsTool {
    const NAME: &'static str = "get_toolset_tools";
    const TITLE: &'static str = "List all tools in a toolset";
    const DESCRIPTION: &'static str = "Lists all the capabilities that are enabled with the specified toolset. Use this to get clarity on whether enabling a toolset would help you to complete a task";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ToolsetNameParams;
    type Context = Weak<ToolsetGroup>;
    type Output = Vec<ToolSummary>;

    fn extract(request: &ToolRequest) -> ParamResult<ToolsetNameParams> {
        ToolsetNameParams::extract(request)
    }

    async fn execute(
        group: &Weak<ToolsetGroup>,
        params: ToolsetNameParams,
    ) -> ToolResult<Vec<ToolSummary>> {
        let group = upgrade(group)?;
        let toolset = group
            .toolset(&params.toolset)
            .ok_or_else(|| not_found(&params.toolset))?;

        Ok(toolset
            .available_tools(group.is_read_only())
            .map(|tool| ToolSummary {
                name: tool.name().to_string(),
                description: tool
                    .tool()
                    .description
                    .as_deref()
                    .unwrap_or_default()
                    .to_string(),
                read_only: tool.is_read_only(),
            })
            .collect())
    }
}

/// Enables a toolset by name.
pub struct EnableToolsetTool;

impl ToolDefinition for EnableToolsetTool {
    const NAME: &'static str = "enable_toolset";
    const TITLE: &'static str = "Enable a toolset";
    const DESCRIPTION: &'static str = "Enable one of the sets of tools the GitHub MCP server provides, use get_toolset_tools and list_available_toolsets first to see what this will enable";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = ToolsetNameParams;
    type Context = Weak<ToolsetGroup>;
    type Output = EnableOutcome;

    fn extract(request: &ToolRequest) -> ParamResult<ToolsetNameParams> {
        ToolsetNameParams::extract(request)
    }

    async fn execute(group: &Weak<ToolsetGroup>, params: ToolsetNameParams) -> ToolResult<EnableOutcome> {
        let group = upgrade(group)?;
        let name = params.toolset;

        let already = group
            .toolset(&name)
            .ok_or_else(|| not_found(&name))?
            .is_enabled();
        if !group.enable_toolset(&name) {
            return Err(not_found(&name));
        }

        let message = if already {
            format!("Toolset {name} is already enabled")
        } else {
            info!(toolset = %name, "Toolset enabled by client");
            format!("Toolset {name} enabled")
        };
        Ok(EnableOutcome {
            toolset: name,
            enabled: true,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::{Value, json};

    use crate::domains::tools::result::result_text;
    use crate::domains::tools::toolset::tests::stub_tool;

    fn group(read_only: bool) -> Arc<ToolsetGroup> {
        ToolsetGroup::builder(read_only)
            .toolset(
                Toolset::new("repos", "Repository tools")
                    .with_tool(stub_tool("get_commit", ToolAccess::Read))
                    .enabled(true),
            )
            .toolset(
                Toolset::new("issues", "Issue tools")
                    .with_tool(stub_tool("get_issue", ToolAccess::Read))
                    .with_tool(stub_tool("create_issue", ToolAccess::Write)),
            )
            .dynamic(true)
            .build()
            .unwrap()
    }

    fn call(group: &ToolsetGroup, tool: &str, arguments: Value) -> (bool, Value) {
        let descriptor = group.find_enabled_tool(tool).unwrap();
        let result = tokio_test::block_on(descriptor.call(ToolRequest::from_value(tool, arguments)));
        let text = result_text(&result).unwrap().to_string();
        let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));
        (result.is_error.unwrap_or(false), payload)
    }

    fn names(group: &ToolsetGroup) -> Vec<String> {
        group
            .enabled_tools()
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    #[test]
    fn test_dynamic_toolset_is_pinned_and_first() {
        let group = group(false);
        assert!(group.is_dynamic());
        assert_eq!(group.toolsets()[0].name(), DYNAMIC_TOOLSET);

        group.disable_all();
        assert_eq!(
            names(&group),
            ["list_available_toolsets", "get_toolset_tools", "enable_toolset"]
        );
    }

    #[test]
    fn test_enable_toolset_changes_enabled_tools() {
        let group = group(false);
        assert!(!names(&group).contains(&"get_issue".to_string()));
        let version = group.version();

        let (is_error, payload) = call(&group, "enable_toolset", json!({ "toolset": "issues" }));
        assert!(!is_error);
        assert_eq!(payload["message"], "Toolset issues enabled");
        assert_eq!(group.version(), version + 1);

        let names = names(&group);
        assert!(names.contains(&"get_issue".to_string()));
        assert!(names.contains(&"create_issue".to_string()));
    }

    #[test]
    fn test_enable_already_enabled_toolset() {
        let group = group(false);
        let (is_error, payload) = call(&group, "enable_toolset", json!({ "toolset": "repos" }));
        assert!(!is_error);
        assert_eq!(payload["message"], "Toolset repos is already enabled");
        assert_eq!(group.version(), 0);
    }

    #[test]
    fn test_enable_unknown_toolset() {
        let group = group(false);
        let (is_error, payload) = call(&group, "enable_toolset", json!({ "toolset": "nope" }));
        assert!(is_error);
        assert_eq!(payload, Value::String("Toolset nope not found".to_string()));
    }

    #[test]
    fn test_enable_toolset_requires_name() {
        let group = group(false);
        let (is_error, payload) = call(&group, "enable_toolset", json!({ "toolset": "" }));
        assert!(is_error);
        assert_eq!(
            payload,
            Value::String("missing required parameter: toolset".to_string())
        );
    }

    #[test]
    fn test_list_available_toolsets() {
        let group = group(false);
        let (is_error, payload) = call(&group, "list_available_toolsets", json!({}));
        assert!(!is_error);
        assert_eq!(
            payload,
            json!([
                {
                    "name": "repos",
                    "description": "Repository tools",
                    "can_enable": true,
                    "currently_enabled": true
                },
                {
                    "name": "issues",
                    "description": "Issue tools",
                    "can_enable": true,
                    "currently_enabled": false
                }
            ])
        );
    }

    #[test]
    fn test_get_toolset_tools_honors_read_only() {
        let group = group(true);
        let (is_error, payload) = call(&group, "get_toolset_tools", json!({ "toolset": "issues" }));
        assert!(!is_error);
        assert_eq!(
            payload,
            json!([{ "name": "get_issue", "description": "get_issue tool", "read_only": true }])
        );

        let (is_error, _) = call(&group, "get_toolset_tools", json!({ "toolset": "nope" }));
        assert!(is_error);
    }

    #[test]
    fn test_read_only_hides_enable_toolset() {
        let group = group(true);
        assert!(group.find_enabled_tool("enable_toolset").is_none());
        assert!(group.find_enabled_tool("list_available_toolsets").is_some());
    }
}
