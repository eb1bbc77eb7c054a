//! Toolsets: named groups of tools that are enabled and disabled together.

use std::sync::atomic::{AtomicBool, Ordering};

use super::handlers::{ToolAccess, ToolDescriptor};

/// A named collection of tools, partitioned by access level.
///
/// Tools keep insertion order within each partition. The enabled flag is
/// atomic so enablement can change while calls are in flight.
#[derive(Debug)]
pub struct Toolset {
    name: String,
    description: String,
    read_tools: Vec<ToolDescriptor>,
    write_tools: Vec<ToolDescriptor>,
    enabled: AtomicBool,
    pinned: bool,
}

impl Toolset {
    /// Create an empty, disabled toolset.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            read_tools: Vec::new(),
            write_tools: Vec::new(),
            enabled: AtomicBool::new(false),
            pinned: false,
        }
    }

    /// Add a tool, filed under its declared access level.
    pub fn with_tool(mut self, tool: ToolDescriptor) -> Self {
        self.add_tool(tool);
        self
    }

    /// Add several tools.
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolDescriptor>) -> Self {
        for tool in tools {
            self.add_tool(tool);
        }
        self
    }

    /// Set the initial enabled state.
    pub fn enabled(self, enabled: bool) -> Self {
        self.enabled.store(enabled, Ordering::SeqCst);
        self
    }

    /// Mark the toolset as always enabled. A pinned toolset starts enabled
    /// and ignores disable requests.
    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self.enabled.store(true, Ordering::SeqCst);
        self
    }

    pub fn add_tool(&mut self, tool: ToolDescriptor) {
        match tool.access() {
            ToolAccess::Read => self.read_tools.push(tool),
            ToolAccess::Write => self.write_tools.push(tool),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Enable the toolset. Returns true if the state changed.
    pub(crate) fn enable(&self) -> bool {
        !self.enabled.swap(true, Ordering::SeqCst)
    }

    /// Disable the toolset unless pinned. Returns true if the state changed.
    pub(crate) fn disable(&self) -> bool {
        if self.pinned {
            return false;
        }
        self.enabled.swap(false, Ordering::SeqCst)
    }

    pub fn read_tools(&self) -> &[ToolDescriptor] {
        &self.read_tools
    }

    pub fn write_tools(&self) -> &[ToolDescriptor] {
        &self.write_tools
    }

    /// Every tool, read tools first.
    pub fn all_tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.read_tools.iter().chain(self.write_tools.iter())
    }

    /// Tools this toolset exposes when enabled, honoring read-only mode.
    pub fn available_tools(&self, read_only: bool) -> impl Iterator<Item = &ToolDescriptor> {
        let writes: &[ToolDescriptor] = if read_only { &[] } else { &self.write_tools };
        self.read_tools.iter().chain(writes.iter())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use rmcp::model::{CallToolResult, Tool};

    use crate::domains::tools::handlers::ToolHandler;
    use crate::domains::tools::params::ToolRequest;
    use crate::domains::tools::result::marshalled_text_result;

    /// Replies with the name of the tool that was called.
    struct NameHandler;

    #[async_trait]
    impl ToolHandler for NameHandler {
        async fn call(&self, request: ToolRequest) -> CallToolResult {
            marshalled_text_result(request.name())
        }
    }

    /// A minimal descriptor for registry tests.
    pub(crate) fn stub_tool(name: &str, access: ToolAccess) -> ToolDescriptor {
        let tool = Tool {
            name: name.to_string().into(),
            title: None,
            description: Some(format!("{name} tool").into()),
            input_schema: Arc::new(serde_json::Map::new()),
            output_schema: None,
            annotations: None,
            icons: None,
            meta: None,
        };
        ToolDescriptor::new(tool, access, Arc::new(NameHandler))
    }

    fn names<'a>(tools: impl Iterator<Item = &'a ToolDescriptor>) -> Vec<&'a str> {
        tools.map(|t| t.name()).collect()
    }

    #[test]
    fn test_tools_are_partitioned_by_access() {
        let toolset = Toolset::new("repos", "Repository tools")
            .with_tool(stub_tool("create_branch", ToolAccess::Write))
            .with_tool(stub_tool("get_commit", ToolAccess::Read))
            .with_tool(stub_tool("list_commits", ToolAccess::Read));

        assert_eq!(names(toolset.read_tools().iter()), ["get_commit", "list_commits"]);
        assert_eq!(names(toolset.write_tools().iter()), ["create_branch"]);
        assert_eq!(
            names(toolset.all_tools()),
            ["get_commit", "list_commits", "create_branch"]
        );
        assert_eq!(
            names(toolset.available_tools(true)),
            ["get_commit", "list_commits"]
        );
    }

    #[test]
    fn test_enable_disable_report_changes() {
        let toolset = Toolset::new("issues", "Issue tools");
        assert!(!toolset.is_enabled());
        assert!(toolset.enable());
        assert!(!toolset.enable());
        assert!(toolset.is_enabled());
        assert!(toolset.disable());
        assert!(!toolset.disable());
        assert!(!toolset.is_enabled());
    }

    #[test]
    fn test_pinned_toolset_ignores_disable() {
        let toolset = Toolset::new("dynamic", "Discover toolsets").pinned();
        assert!(toolset.is_enabled());
        assert!(toolset.is_pinned());
        assert!(!toolset.disable());
        assert!(toolset.is_enabled());
    }
}
