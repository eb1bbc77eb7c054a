//! Discussions, served through the GraphQL API.

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Value, json};

use super::common::{RepoParams, graphql};
use crate::core::github::SharedClient;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use crate::domains::tools::pagination::{
    CursorPaginationParams, optional_cursor_pagination_params,
};
use crate::domains::tools::params::{ParamResult, ToolRequest, optional_param, required_int_param};
use crate::domains::tools::toolset::Toolset;

pub const TOOLSET: &str = "discussions";

pub fn toolset(client: &SharedClient) -> Toolset {
    Toolset::new(TOOLSET, "GitHub Discussions related tools").with_tools([
        ToolDescriptor::from_definition::<GetDiscussionTool>(client.clone()),
        ToolDescriptor::from_definition::<ListDiscussionsTool>(client.clone()),
    ])
}

const GET_DISCUSSION_QUERY: &str = r#"
query($owner: String!, $repo: String!, $number: Int!) {
  repository(owner: $owner, name: $repo) {
    discussion(number: $number) {
      number
      title
      body
      url
      createdAt
      closed
      isAnswered
      author { login }
      category { name }
    }
  }
}"#;

const LIST_DISCUSSIONS_QUERY: &str = r#"
query($owner: String!, $repo: String!, $first: Int, $after: String, $categoryId: ID) {
  repository(owner: $owner, name: $repo) {
    discussions(first: $first, after: $after, categoryId: $categoryId) {
      nodes {
        number
        title
        url
        createdAt
        updatedAt
        author { login }
        category { name }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
      totalCount
    }
  }
}"#;

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetDiscussionParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Discussion number
    pub discussion_number: i64,
}

pub struct GetDiscussionTool;

impl ToolDefinition for GetDiscussionTool {
    const NAME: &'static str = "get_discussion";
    const TITLE: &'static str = "Get discussion";
    const DESCRIPTION: &'static str = "Get details for a GitHub discussion";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = GetDiscussionParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<GetDiscussionParams> {
        Ok(GetDiscussionParams {
            repo: RepoParams::extract(request)?,
            discussion_number: required_int_param(request, "discussion_number")?,
        })
    }

    async fn execute(client: &SharedClient, params: GetDiscussionParams) -> ToolResult<Value> {
        let variables = json!({
            "owner": params.repo.owner,
            "repo": params.repo.repo,
            "number": params.discussion_number,
        });
        let data = graphql(
            client.as_ref(),
            GET_DISCUSSION_QUERY,
            variables,
            "failed to get discussion",
        )
        .await?;

        match data.pointer("/repository/discussion") {
            Some(discussion) if !discussion.is_null() => Ok(discussion.clone()),
            _ => Err(ToolError::not_found(format!(
                "discussion {} not found in {}/{}",
                params.discussion_number, params.repo.owner, params.repo.repo
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListDiscussionsParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Optional filter by discussion category ID. If provided, only discussions with this category are listed.
    pub category: Option<String>,

    #[serde(flatten)]
    pub pagination: CursorPaginationParams,
}

pub struct ListDiscussionsTool;

impl ToolDefinition for ListDiscussionsTool {
    const NAME: &'static str = "list_discussions";
    const TITLE: &'static str = "List discussions";
    const DESCRIPTION: &'static str = "List discussions for a repository";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListDiscussionsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListDiscussionsParams> {
        Ok(ListDiscussionsParams {
            repo: RepoParams::extract(request)?,
            category: optional_param(request, "category")?,
            pagination: optional_cursor_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: ListDiscussionsParams) -> ToolResult<Value> {
        let page = params.pagination.to_graphql();
        let variables = json!({
            "owner": params.repo.owner,
            "repo": params.repo.repo,
            "first": page.first,
            "after": page.after,
            "categoryId": params.category.filter(|c| !c.is_empty()),
        });
        let data = graphql(
            client.as_ref(),
            LIST_DISCUSSIONS_QUERY,
            variables,
            "failed to list discussions",
        )
        .await?;

        let connection = data
            .pointer("/repository/discussions")
            .cloned()
            .unwrap_or(Value::Null);
        Ok(json!({
            "discussions": connection.get("nodes").cloned().unwrap_or_else(|| json!([])),
            "pageInfo": connection.get("pageInfo").cloned().unwrap_or(Value::Null),
            "totalCount": connection.get("totalCount").cloned().unwrap_or(Value::from(0)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::github::mock::MockGitHub;
    use crate::domains::tools::result::result_text;

    async fn call<T: ToolDefinition<Context = SharedClient>>(
        mock: &std::sync::Arc<MockGitHub>,
        arguments: Value,
    ) -> rmcp::model::CallToolResult {
        let client: SharedClient = mock.clone();
        ToolDescriptor::from_definition::<T>(client)
            .call(ToolRequest::from_value(T::NAME, arguments))
            .await
    }

    #[tokio::test]
    async fn test_get_discussion() {
        let mock = MockGitHub::returning(json!({
            "repository": { "discussion": { "number": 4, "title": "Ideas" } }
        }));
        let result = call::<GetDiscussionTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "discussion_number": 4 }),
        )
        .await;

        assert_eq!(result_text(&result), Some(r#"{"number":4,"title":"Ideas"}"#));
        let (_, variables) = &mock.graphql_calls()[0];
        assert_eq!(variables, &json!({ "owner": "o", "repo": "r", "number": 4 }));
    }

    #[tokio::test]
    async fn test_get_discussion_missing() {
        let mock = MockGitHub::returning(json!({ "repository": { "discussion": null } }));
        let result = call::<GetDiscussionTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "discussion_number": 9 }),
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), Some("discussion 9 not found in o/r"));
    }

    #[tokio::test]
    async fn test_list_discussions_cursor() {
        let mock = MockGitHub::returning(json!({
            "repository": { "discussions": {
                "nodes": [{ "number": 1 }],
                "pageInfo": { "hasNextPage": false, "endCursor": "Y3Vy" },
                "totalCount": 1
            } }
        }));
        let result = call::<ListDiscussionsTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "perPage": 10, "after": "abc" }),
        )
        .await;

        let (_, variables) = &mock.graphql_calls()[0];
        assert_eq!(variables["first"], 10);
        assert_eq!(variables["after"], "abc");
        assert!(variables["categoryId"].is_null());

        let body: Value = serde_json::from_str(result_text(&result).unwrap()).unwrap();
        assert_eq!(body["totalCount"], 1);
        assert_eq!(body["discussions"][0]["number"], 1);
    }

    #[tokio::test]
    async fn test_list_discussions_graphql_failure() {
        let mock = MockGitHub::failing(502, "Bad Gateway");
        let result = call::<ListDiscussionsTool>(&mock, json!({ "owner": "o", "repo": "r" })).await;

        assert_eq!(
            result_text(&result),
            Some("failed to list discussions: POST graphql returned 502: Bad Gateway")
        );
    }
}
