//! User and organization search.
//!
//! Both tools hit the user search endpoint; the account type qualifier
//! decides whether users or organizations come back.

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use super::common::{qualified_query, send};
use crate::core::github::{ApiRequest, SharedClient};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use crate::domains::tools::pagination::{PaginationParams, optional_pagination_params};
use crate::domains::tools::params::{ParamResult, ToolRequest, optional_param, required_param};
use crate::domains::tools::toolset::Toolset;

pub const USERS_TOOLSET: &str = "users";
pub const ORGS_TOOLSET: &str = "orgs";

pub fn users_toolset(client: &SharedClient) -> Toolset {
    Toolset::new(USERS_TOOLSET, "GitHub User related tools")
        .with_tool(ToolDescriptor::from_definition::<SearchUsersTool>(client.clone()))
}

pub fn orgs_toolset(client: &SharedClient) -> Toolset {
    Toolset::new(ORGS_TOOLSET, "GitHub Organization related tools")
        .with_tool(ToolDescriptor::from_definition::<SearchOrgsTool>(client.clone()))
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchAccountsParams {
    /// Search query using GitHub users search syntax
    pub query: String,

    /// Sort field by category
    #[schemars(extend("enum" = ["followers", "repositories", "joined"]))]
    pub sort: Option<String>,

    /// Sort order
    #[schemars(extend("enum" = ["asc", "desc"]))]
    pub order: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl SearchAccountsParams {
    fn extract(request: &ToolRequest) -> ParamResult<Self> {
        Ok(Self {
            query: required_param(request, "query")?,
            sort: optional_param(request, "sort")?,
            order: optional_param(request, "order")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn search(self, client: &SharedClient, qualifier: &str, action: &str) -> ToolResult<Value> {
        let request = ApiRequest::get("/search/users")
            .query("q", qualified_query(qualifier, &self.query))
            .query_opt("sort", self.sort)
            .query_opt("order", self.order);
        send(client.as_ref(), self.pagination.apply(request), action).await
    }
}

pub struct SearchUsersTool;

impl ToolDefinition for SearchUsersTool {
    const NAME: &'static str = "search_users";
    const TITLE: &'static str = "Search users";
    const DESCRIPTION: &'static str = "Find GitHub users by username, real name, or other profile information. Useful for locating developers, contributors, or team members.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = SearchAccountsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<SearchAccountsParams> {
        SearchAccountsParams::extract(request)
    }

    async fn execute(client: &SharedClient, params: SearchAccountsParams) -> ToolResult<Value> {
        params.search(client, "type:user", "failed to search users").await
    }
}

pub struct SearchOrgsTool;

impl ToolDefinition for SearchOrgsTool {
    const NAME: &'static str = "search_orgs";
    const TITLE: &'static str = "Search organizations";
    const DESCRIPTION: &'static str = "Find GitHub organizations by name, location, or other organization metadata. Ideal for discovering companies, open source foundations, or teams.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = SearchAccountsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<SearchAccountsParams> {
        SearchAccountsParams::extract(request)
    }

    async fn execute(client: &SharedClient, params: SearchAccountsParams) -> ToolResult<Value> {
        params.search(client, "type:org", "failed to search organizations").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::github::mock::MockGitHub;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_users_and_orgs_qualify_query() {
        let mock = MockGitHub::returning(json!({ "items": [] }));
        let client: SharedClient = mock.clone();

        ToolDescriptor::from_definition::<SearchUsersTool>(client.clone())
            .call(ToolRequest::from_value("search_users", json!({ "query": "octo" })))
            .await;
        ToolDescriptor::from_definition::<SearchOrgsTool>(client)
            .call(ToolRequest::from_value(
                "search_orgs",
                json!({ "query": "location:berlin", "sort": "repositories" }),
            ))
            .await;

        let requests = mock.requests();
        assert_eq!(requests[0].path(), "/search/users");
        assert_eq!(requests[0].query_pairs()[0].1, "type:user octo");
        assert_eq!(requests[1].query_pairs()[0].1, "type:org location:berlin");
        assert_eq!(
            requests[1].query_pairs()[1],
            ("sort".to_string(), "repositories".to_string())
        );
    }

    #[test]
    fn test_toolsets() {
        let client: SharedClient = MockGitHub::returning(Value::Null);
        assert_eq!(users_toolset(&client).read_tools()[0].name(), "search_users");
        assert_eq!(orgs_toolset(&client).read_tools()[0].name(), "search_orgs");
    }
}
