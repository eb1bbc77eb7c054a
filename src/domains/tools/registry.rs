//! Toolset registry - owns every toolset and decides which tools are exposed.
//!
//! This module provides:
//! - Construction-time validation (unique toolset and tool names)
//! - Runtime enable/disable of toolsets, tracked by a version counter
//! - The exposed tool list, with write tools removed in read-only mode

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::dynamic::{DYNAMIC_TOOLSET, dynamic_toolset};
use super::handlers::ToolDescriptor;
use super::toolset::Toolset;

/// Special toolset name meaning "every toolset".
pub const ALL_TOOLSETS: &str = "all";

/// Errors detected while assembling a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("toolset {0} is registered more than once")]
    DuplicateToolset(String),

    #[error("tool {tool} in toolset {toolset} is already registered")]
    DuplicateTool { tool: String, toolset: String },
}

// ============================================================================
// Builder
// ============================================================================

/// Collects toolsets before the registry is frozen.
#[derive(Debug)]
pub struct ToolsetGroupBuilder {
    read_only: bool,
    dynamic: bool,
    toolsets: Vec<Toolset>,
}

impl ToolsetGroupBuilder {
    /// Register a toolset. Order of registration is the order tools are listed.
    pub fn toolset(mut self, toolset: Toolset) -> Self {
        self.toolsets.push(toolset);
        self
    }

    pub fn toolsets(mut self, toolsets: impl IntoIterator<Item = Toolset>) -> Self {
        self.toolsets.extend(toolsets);
        self
    }

    /// Add the pinned `dynamic` toolset that lets clients enable toolsets.
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Freeze the registry.
    pub fn build(self) -> Result<Arc<ToolsetGroup>, RegistryError> {
        let Self {
            read_only,
            dynamic,
            toolsets,
        } = self;

        let group = Arc::new_cyclic(|group| {
            let mut all = Vec::with_capacity(toolsets.len() + 1);
            if dynamic {
                all.push(dynamic_toolset(group.clone()));
            }
            all.extend(toolsets);
            ToolsetGroup::assemble(read_only, all)
        });
        group.validate()?;

        info!(
            toolsets = group.toolsets.len(),
            read_only, dynamic, "Toolset registry built"
        );
        Ok(group)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// All toolsets known to the server.
///
/// Read-only mode is fixed at construction. Enablement is per toolset and
/// can change at any time; every change bumps [`ToolsetGroup::version`].
#[derive(Debug)]
pub struct ToolsetGroup {
    read_only: bool,
    toolsets: Vec<Toolset>,
    index: HashMap<String, usize>,
    version: AtomicU64,
}

impl ToolsetGroup {
    /// Start building a registry.
    pub fn builder(read_only: bool) -> ToolsetGroupBuilder {
        ToolsetGroupBuilder {
            read_only,
            dynamic: false,
            toolsets: Vec::new(),
        }
    }

    fn assemble(read_only: bool, toolsets: Vec<Toolset>) -> Self {
        let mut index = HashMap::with_capacity(toolsets.len());
        for (position, toolset) in toolsets.iter().enumerate() {
            index.entry(toolset.name().to_string()).or_insert(position);
        }
        Self {
            read_only,
            toolsets,
            index,
            version: AtomicU64::new(0),
        }
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.index.len() != self.toolsets.len() {
            let mut seen = HashSet::new();
            for toolset in &self.toolsets {
                if !seen.insert(toolset.name()) {
                    return Err(RegistryError::DuplicateToolset(toolset.name().to_string()));
                }
            }
        }

        let mut tools = HashSet::new();
        for toolset in &self.toolsets {
            for tool in toolset.all_tools() {
                if !tools.insert(tool.name()) {
                    return Err(RegistryError::DuplicateTool {
                        tool: tool.name().to_string(),
                        toolset: toolset.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Counter incremented on every enablement change.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Every toolset, in registration order.
    pub fn toolsets(&self) -> &[Toolset] {
        &self.toolsets
    }

    pub fn toolset(&self, name: &str) -> Option<&Toolset> {
        self.index.get(name).map(|&i| &self.toolsets[i])
    }

    /// Whether the `dynamic` toolset is registered.
    pub fn is_dynamic(&self) -> bool {
        self.index.contains_key(DYNAMIC_TOOLSET)
    }

    /// Enable a toolset by name.
    ///
    /// Returns false (and changes nothing) when the name is unknown.
    pub fn enable_toolset(&self, name: &str) -> bool {
        match self.toolset(name) {
            Some(toolset) => {
                if toolset.enable() {
                    self.bump();
                    info!(toolset = name, "Toolset enabled");
                }
                true
            }
            None => {
                debug!(toolset = name, "Ignoring unknown toolset");
                false
            }
        }
    }

    /// Disable a toolset by name. Pinned toolsets stay enabled.
    ///
    /// Returns false when the name is unknown.
    pub fn disable_toolset(&self, name: &str) -> bool {
        match self.toolset(name) {
            Some(toolset) => {
                if toolset.disable() {
                    self.bump();
                    info!(toolset = name, "Toolset disabled");
                }
                true
            }
            None => false,
        }
    }

    pub fn enable_all(&self) {
        for toolset in &self.toolsets {
            if toolset.enable() {
                self.bump();
            }
        }
    }

    /// Disable every toolset except pinned ones.
    pub fn disable_all(&self) {
        for toolset in &self.toolsets {
            if toolset.disable() {
                self.bump();
            }
        }
    }

    /// Apply a configured toolset selection.
    ///
    /// `None` keeps the registered defaults. A list containing `all` enables
    /// everything. Otherwise only the named toolsets are enabled. Returns the
    /// names that matched no toolset.
    pub fn select_toolsets(&self, names: Option<&[String]>) -> Vec<String> {
        let Some(names) = names else {
            return Vec::new();
        };

        if names.iter().any(|n| n.trim() == ALL_TOOLSETS) {
            self.enable_all();
            return Vec::new();
        }

        self.disable_all();
        let mut unknown = Vec::new();
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if !self.enable_toolset(name) {
                warn!(toolset = name, "Unknown toolset requested");
                unknown.push(name.to_string());
            }
        }
        unknown
    }

    /// Tools currently exposed to clients.
    ///
    /// Toolsets in registration order, read tools before write tools. Write
    /// tools are omitted entirely in read-only mode.
    pub fn enabled_tools(&self) -> Vec<ToolDescriptor> {
        self.toolsets
            .iter()
            .filter(|t| t.is_enabled())
            .flat_map(|t| t.available_tools(self.read_only))
            .cloned()
            .collect()
    }

    /// Find an exposed tool by name.
    pub fn find_enabled_tool(&self, name: &str) -> Option<ToolDescriptor> {
        self.toolsets
            .iter()
            .filter(|t| t.is_enabled())
            .flat_map(|t| t.available_tools(self.read_only))
            .find(|tool| tool.name() == name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::handlers::ToolAccess;
    use crate::domains::tools::toolset::tests::stub_tool;

    fn repos() -> Toolset {
        Toolset::new("repos", "Repository tools")
            .with_tool(stub_tool("get_commit", ToolAccess::Read))
            .with_tool(stub_tool("create_branch", ToolAccess::Write))
            .enabled(true)
    }

    fn issues() -> Toolset {
        Toolset::new("issues", "Issue tools")
            .with_tool(stub_tool("create_issue", ToolAccess::Write))
            .with_tool(stub_tool("get_issue", ToolAccess::Read))
            .enabled(true)
    }

    fn experiments() -> Toolset {
        Toolset::new("experiments", "Experimental tools")
    }

    fn group(read_only: bool) -> Arc<ToolsetGroup> {
        ToolsetGroup::builder(read_only)
            .toolset(repos())
            .toolset(issues())
            .toolset(experiments())
            .build()
            .unwrap()
    }

    fn names(tools: &[ToolDescriptor]) -> Vec<&str> {
        tools.iter().map(|t| t.name()).collect()
    }

    #[test]
    fn test_enabled_tools_order() {
        let group = group(false);
        assert_eq!(
            names(&group.enabled_tools()),
            ["get_commit", "create_branch", "get_issue", "create_issue"]
        );
    }

    #[test]
    fn test_read_only_hides_write_tools() {
        let group = group(true);
        assert!(group.is_read_only());
        assert_eq!(names(&group.enabled_tools()), ["get_commit", "get_issue"]);
        assert!(group.find_enabled_tool("create_issue").is_none());
        assert!(group.find_enabled_tool("get_issue").is_some());
    }

    #[test]
    fn test_enable_unknown_toolset() {
        let group = group(false);
        let before = group.enabled_tools();
        assert!(!group.enable_toolset("nope"));
        assert_eq!(names(&group.enabled_tools()), names(&before));
        assert_eq!(group.version(), 0);
    }

    #[test]
    fn test_enable_is_idempotent_and_versioned() {
        let group = group(false);
        group.disable_all();
        let version = group.version();
        assert!(group.enabled_tools().is_empty());

        assert!(group.enable_toolset("issues"));
        assert_eq!(group.version(), version + 1);
        assert!(group.enable_toolset("issues"));
        assert_eq!(group.version(), version + 1);
        assert_eq!(names(&group.enabled_tools()), ["get_issue", "create_issue"]);
    }

    #[test]
    fn test_disable_toolset() {
        let group = group(false);
        assert!(group.disable_toolset("repos"));
        assert!(!group.disable_toolset("nope"));
        assert!(group.find_enabled_tool("get_commit").is_none());
        assert_eq!(group.version(), 1);
    }

    #[test]
    fn test_enable_all() {
        let group = group(false);
        group.enable_all();
        assert!(group.toolset("experiments").unwrap().is_enabled());
        assert_eq!(group.version(), 1);
    }

    #[test]
    fn test_duplicate_toolset() {
        let err = ToolsetGroup::builder(false)
            .toolset(repos())
            .toolset(Toolset::new("repos", "again"))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateToolset("repos".to_string()));
    }

    #[test]
    fn test_duplicate_tool_across_toolsets() {
        let err = ToolsetGroup::builder(false)
            .toolset(repos())
            .toolset(Toolset::new("other", "other").with_tool(stub_tool("get_commit", ToolAccess::Read)))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateTool {
                tool: "get_commit".to_string(),
                toolset: "other".to_string(),
            }
        );
    }

    #[test]
    fn test_select_toolsets_none_keeps_defaults() {
        let group = group(false);
        assert!(group.select_toolsets(None).is_empty());
        assert!(group.toolset("repos").unwrap().is_enabled());
        assert!(!group.toolset("experiments").unwrap().is_enabled());
    }

    #[test]
    fn test_select_toolsets_named() {
        let group = group(false);
        let unknown = group.select_toolsets(Some(&[
            "issues".to_string(),
            " nope ".to_string(),
        ]));
        assert_eq!(unknown, ["nope"]);
        assert_eq!(names(&group.enabled_tools()), ["get_issue", "create_issue"]);
    }

    #[test]
    fn test_select_toolsets_all() {
        let group = group(false);
        let unknown = group.select_toolsets(Some(&["all".to_string()]));
        assert!(unknown.is_empty());
        assert!(group.toolsets().iter().all(|t| t.is_enabled()));
    }

    #[test]
    fn test_concurrent_enable() {
        let group = group(false);
        group.disable_all();
        let version = group.version();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    group.enable_toolset("repos");
                    let _ = group.enabled_tools();
                });
            }
        });

        assert_eq!(group.version(), version + 1);
        assert_eq!(names(&group.enabled_tools()), ["get_commit", "create_branch"]);
    }
}
