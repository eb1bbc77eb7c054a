//! Default toolset catalog - builds every GitHub toolset and the registry.
//!
//! The catalog is assembled once at startup. Toolsets that share a client
//! each hold their own `Arc` clone of it.

use std::sync::Arc;

use tracing::warn;

use super::definitions::{
    actions, context, discussions, gists, issues, notifications, pull_requests, repos, security,
    users,
};
use super::registry::{RegistryError, ToolsetGroup};
use super::toolset::Toolset;
use crate::core::github::SharedClient;

/// Name of the placeholder toolset for features still in preview.
pub const EXPERIMENTS_TOOLSET: &str = "experiments";

/// Every GitHub toolset, in listing order.
///
/// All toolsets start enabled except `experiments`.
pub fn default_toolsets(client: &SharedClient) -> Vec<Toolset> {
    vec![
        context::toolset(client).enabled(true),
        repos::toolset(client).enabled(true),
        issues::toolset(client).enabled(true),
        users::orgs_toolset(client).enabled(true),
        users::users_toolset(client).enabled(true),
        pull_requests::toolset(client).enabled(true),
        actions::toolset(client).enabled(true),
        security::code_security_toolset(client).enabled(true),
        security::secret_protection_toolset(client).enabled(true),
        security::dependabot_toolset(client).enabled(true),
        notifications::toolset(client).enabled(true),
        Toolset::new(EXPERIMENTS_TOOLSET, "Experimental features"),
        discussions::toolset(client).enabled(true),
        gists::toolset(client).enabled(true),
        security::security_advisories_toolset(client).enabled(true),
    ]
}

/// Build the registry for a server.
///
/// `selection` is the configured toolset list (`None` keeps the catalog
/// defaults). Unknown names are logged and otherwise ignored.
pub fn build_registry(
    client: &SharedClient,
    read_only: bool,
    dynamic: bool,
    selection: Option<&[String]>,
) -> Result<Arc<ToolsetGroup>, RegistryError> {
    let group = ToolsetGroup::builder(read_only)
        .toolsets(default_toolsets(client))
        .dynamic(dynamic)
        .build()?;

    for name in group.select_toolsets(selection) {
        warn!(toolset = %name, "Toolset not found in catalog; skipping");
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::github::mock::MockGitHub;
    use crate::domains::tools::dynamic::DYNAMIC_TOOLSET;
    use serde_json::Value;

    fn client() -> SharedClient {
        MockGitHub::returning(Value::Null)
    }

    fn names(group: &ToolsetGroup) -> Vec<String> {
        group
            .enabled_tools()
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    #[test]
    fn test_catalog_order_and_defaults() {
        let toolsets = default_toolsets(&client());
        let order: Vec<&str> = toolsets.iter().map(|t| t.name()).collect();
        assert_eq!(
            order,
            [
                "context",
                "repos",
                "issues",
                "orgs",
                "users",
                "pull_requests",
                "actions",
                "code_security",
                "secret_protection",
                "dependabot",
                "notifications",
                "experiments",
                "discussions",
                "gists",
                "security_advisories",
            ]
        );

        for toolset in &toolsets {
            assert_eq!(toolset.is_enabled(), toolset.name() != EXPERIMENTS_TOOLSET);
        }
    }

    #[test]
    fn test_catalog_builds_without_duplicates() {
        let group = build_registry(&client(), false, true, None).unwrap();
        assert_eq!(group.toolsets()[0].name(), DYNAMIC_TOOLSET);
        assert!(group.find_enabled_tool("get_me").is_some());
        assert!(group.find_enabled_tool("create_gist").is_some());
    }

    #[test]
    fn test_read_only_hides_write_tools() {
        let group = build_registry(&client(), true, false, None).unwrap();
        let exposed = names(&group);
        assert!(exposed.contains(&"get_issue".to_string()));
        assert!(!exposed.contains(&"create_issue".to_string()));
        assert!(!exposed.contains(&"merge_pull_request".to_string()));
        assert!(group.enabled_tools().iter().all(|t| t.is_read_only()));
    }

    #[test]
    fn test_selection_limits_tools() {
        let selection = vec!["repos".to_string(), "nope".to_string()];
        let group = build_registry(&client(), false, false, Some(&selection)).unwrap();

        let enabled: Vec<&str> = group
            .toolsets()
            .iter()
            .filter(|t| t.is_enabled())
            .map(|t| t.name())
            .collect();
        assert_eq!(enabled, ["repos"]);
        assert_eq!(names(&group)[0], "get_commit");
    }

    #[test]
    fn test_all_selection_enables_experiments() {
        let selection = vec!["all".to_string()];
        let group = build_registry(&client(), false, false, Some(&selection)).unwrap();
        assert!(group.toolset(EXPERIMENTS_TOOLSET).unwrap().is_enabled());
    }
}
