//! Issue tools.

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use super::common::{RepoParams, qualified_query, send};
use crate::core::github::{ApiRequest, SharedClient};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use crate::domains::tools::pagination::{PaginationParams, optional_pagination_params};
use crate::domains::tools::params::{
    ParamResult, ToolRequest, optional_int_param, optional_param, optional_string_array_param,
    required_int_param, required_param,
};
use crate::domains::tools::toolset::Toolset;

pub const TOOLSET: &str = "issues";

pub fn toolset(client: &SharedClient) -> Toolset {
    Toolset::new(TOOLSET, "GitHub Issues related tools").with_tools([
        ToolDescriptor::from_definition::<GetIssueTool>(client.clone()),
        ToolDescriptor::from_definition::<SearchIssuesTool>(client.clone()),
        ToolDescriptor::from_definition::<GetIssueCommentsTool>(client.clone()),
        ToolDescriptor::from_definition::<ListIssuesTool>(client.clone()),
        ToolDescriptor::from_definition::<CreateIssueTool>(client.clone()),
        ToolDescriptor::from_definition::<UpdateIssueTool>(client.clone()),
        ToolDescriptor::from_definition::<AddIssueCommentTool>(client.clone()),
    ])
}

/// Parameters identifying one issue.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetIssueParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// The number of the issue
    pub issue_number: i64,
}

impl GetIssueParams {
    pub fn extract(request: &ToolRequest) -> ParamResult<Self> {
        Ok(Self {
            repo: RepoParams::extract(request)?,
            issue_number: required_int_param(request, "issue_number")?,
        })
    }

    fn path(&self, suffix: &str) -> String {
        self.repo
            .path(&format!("/issues/{}{}", self.issue_number, suffix))
    }
}

// ============================================================================
// Read tools
// ============================================================================

pub struct GetIssueTool;

impl ToolDefinition for GetIssueTool {
    const NAME: &'static str = "get_issue";
    const TITLE: &'static str = "Get issue details";
    const DESCRIPTION: &'static str = "Get details of a specific issue in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = GetIssueParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<GetIssueParams> {
        GetIssueParams::extract(request)
    }

    async fn execute(client: &SharedClient, params: GetIssueParams) -> ToolResult<Value> {
        send(
            client.as_ref(),
            ApiRequest::get(params.path("")),
            format!("failed to get issue {}", params.issue_number),
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchIssuesParams {
    /// Search query using GitHub issues search syntax
    pub query: String,

    /// Sort field by number of matches of categories, defaults to best match
    #[schemars(extend("enum" = [
        "comments", "reactions", "reactions-+1", "reactions--1", "reactions-smile",
        "reactions-thinking_face", "reactions-heart", "reactions-tada", "interactions",
        "created", "updated"
    ]))]
    pub sort: Option<String>,

    /// Sort order
    #[schemars(extend("enum" = ["asc", "desc"]))]
    pub order: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct SearchIssuesTool;

impl ToolDefinition for SearchIssuesTool {
    const NAME: &'static str = "search_issues";
    const TITLE: &'static str = "Search issues";
    const DESCRIPTION: &'static str = "Search for issues in GitHub repositories using issues search syntax already scoped to is:issue";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = SearchIssuesParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<SearchIssuesParams> {
        Ok(SearchIssuesParams {
            query: required_param(request, "query")?,
            sort: optional_param(request, "sort")?,
            order: optional_param(request, "order")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: SearchIssuesParams) -> ToolResult<Value> {
        let request = ApiRequest::get("/search/issues")
            .query("q", qualified_query("is:issue", &params.query))
            .query_opt("sort", params.sort)
            .query_opt("order", params.order);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to search issues",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetIssueCommentsParams {
    #[serde(flatten)]
    pub issue: GetIssueParams,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct GetIssueCommentsTool;

impl ToolDefinition for GetIssueCommentsTool {
    const NAME: &'static str = "get_issue_comments";
    const TITLE: &'static str = "Get issue comments";
    const DESCRIPTION: &'static str = "Get comments for a specific issue in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = GetIssueCommentsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<GetIssueCommentsParams> {
        Ok(GetIssueCommentsParams {
            issue: GetIssueParams::extract(request)?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: GetIssueCommentsParams) -> ToolResult<Value> {
        let request = params
            .pagination
            .apply(ApiRequest::get(params.issue.path("/comments")));
        send(client.as_ref(), request, "failed to get issue comments").await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListIssuesParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Filter by state
    #[schemars(extend("enum" = ["open", "closed", "all"]))]
    pub state: Option<String>,

    /// Filter by labels
    #[serde(default)]
    pub labels: Vec<String>,

    /// Sort order
    #[schemars(extend("enum" = ["created", "updated", "comments"]))]
    pub sort: Option<String>,

    /// Sort direction
    #[schemars(extend("enum" = ["asc", "desc"]))]
    pub direction: Option<String>,

    /// Filter by date (ISO 8601 timestamp)
    pub since: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListIssuesTool;

impl ToolDefinition for ListIssuesTool {
    const NAME: &'static str = "list_issues";
    const TITLE: &'static str = "List issues";
    const DESCRIPTION: &'static str = "List issues in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListIssuesParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListIssuesParams> {
        Ok(ListIssuesParams {
            repo: RepoParams::extract(request)?,
            state: optional_param(request, "state")?,
            labels: optional_string_array_param(request, "labels")?,
            sort: optional_param(request, "sort")?,
            direction: optional_param(request, "direction")?,
            since: optional_param(request, "since")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: ListIssuesParams) -> ToolResult<Value> {
        let labels = (!params.labels.is_empty()).then(|| params.labels.join(","));
        let request = ApiRequest::get(params.repo.path("/issues"))
            .query_opt("state", params.state)
            .query_opt("labels", labels)
            .query_opt("sort", params.sort)
            .query_opt("direction", params.direction)
            .query_opt("since", params.since);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list issues",
        )
        .await
    }
}

// ============================================================================
// Write tools
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CreateIssueParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Issue title
    pub title: String,

    /// Issue body content
    pub body: Option<String>,

    /// Usernames to assign to this issue
    #[serde(default)]
    pub assignees: Vec<String>,

    /// Labels to apply to this issue
    #[serde(default)]
    pub labels: Vec<String>,

    /// Milestone number
    pub milestone: Option<i64>,
}

pub struct CreateIssueTool;

impl ToolDefinition for CreateIssueTool {
    const NAME: &'static str = "create_issue";
    const TITLE: &'static str = "Open new issue";
    const DESCRIPTION: &'static str = "Create a new issue in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = CreateIssueParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<CreateIssueParams> {
        Ok(CreateIssueParams {
            repo: RepoParams::extract(request)?,
            title: required_param(request, "title")?,
            body: optional_param(request, "body")?,
            assignees: optional_string_array_param(request, "assignees")?,
            labels: optional_string_array_param(request, "labels")?,
            milestone: optional_int_param(request, "milestone")?,
        })
    }

    async fn execute(client: &SharedClient, params: CreateIssueParams) -> ToolResult<Value> {
        let mut body = Map::new();
        body.insert("title".to_string(), Value::from(params.title));
        if let Some(text) = params.body {
            body.insert("body".to_string(), Value::from(text));
        }
        body.insert("assignees".to_string(), Value::from(params.assignees));
        body.insert("labels".to_string(), Value::from(params.labels));
        if let Some(milestone) = params.milestone {
            body.insert("milestone".to_string(), Value::from(milestone));
        }

        send(
            client.as_ref(),
            ApiRequest::post(params.repo.path("/issues")).json(Value::Object(body)),
            "failed to create issue",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct UpdateIssueParams {
    #[serde(flatten)]
    pub issue: GetIssueParams,

    /// New title
    pub title: Option<String>,

    /// New description
    pub body: Option<String>,

    /// New state
    #[schemars(extend("enum" = ["open", "closed"]))]
    pub state: Option<String>,

    /// New labels
    pub labels: Option<Vec<String>>,

    /// New assignees
    pub assignees: Option<Vec<String>>,

    /// New milestone number
    pub milestone: Option<i64>,
}

pub struct UpdateIssueTool;

impl ToolDefinition for UpdateIssueTool {
    const NAME: &'static str = "update_issue";
    const TITLE: &'static str = "Edit issue";
    const DESCRIPTION: &'static str = "Update an existing issue in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = UpdateIssueParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<UpdateIssueParams> {
        // Lists are sent only when the key is present.
        let list = |name: &str| -> ParamResult<Option<Vec<String>>> {
            if request.contains(name) {
                optional_string_array_param(request, name).map(Some)
            } else {
                Ok(None)
            }
        };

        Ok(UpdateIssueParams {
            issue: GetIssueParams::extract(request)?,
            title: optional_param(request, "title")?,
            body: optional_param(request, "body")?,
            state: optional_param(request, "state")?,
            labels: list("labels")?,
            assignees: list("assignees")?,
            milestone: optional_int_param(request, "milestone")?,
        })
    }

    async fn execute(client: &SharedClient, params: UpdateIssueParams) -> ToolResult<Value> {
        let mut body = Map::new();
        let fields = [
            ("title", params.title.map(Value::from)),
            ("body", params.body.map(Value::from)),
            ("state", params.state.map(Value::from)),
            ("labels", params.labels.map(Value::from)),
            ("assignees", params.assignees.map(Value::from)),
            ("milestone", params.milestone.map(Value::from)),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                body.insert(key.to_string(), value);
            }
        }

        send(
            client.as_ref(),
            ApiRequest::patch(params.issue.path("")).json(Value::Object(body)),
            format!("failed to update issue {}", params.issue.issue_number),
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AddIssueCommentParams {
    #[serde(flatten)]
    pub issue: GetIssueParams,

    /// Comment content
    pub body: String,
}

pub struct AddIssueCommentTool;

impl ToolDefinition for AddIssueCommentTool {
    const NAME: &'static str = "add_issue_comment";
    const TITLE: &'static str = "Add comment to issue";
    const DESCRIPTION: &'static str = "Add a comment to a specific issue in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = AddIssueCommentParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<AddIssueCommentParams> {
        Ok(AddIssueCommentParams {
            issue: GetIssueParams::extract(request)?,
            body: required_param(request, "body")?,
        })
    }

    async fn execute(client: &SharedClient, params: AddIssueCommentParams) -> ToolResult<Value> {
        let body = serde_json::json!({ "body": params.body });
        send(
            client.as_ref(),
            ApiRequest::post(params.issue.path("/comments")).json(body),
            "failed to add issue comment",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::github::mock::MockGitHub;
    use crate::domains::tools::result::result_text;
    use reqwest::Method;
    use serde_json::json;

    async fn call<T: ToolDefinition<Context = SharedClient>>(
        mock: &std::sync::Arc<MockGitHub>,
        arguments: Value,
    ) -> rmcp::model::CallToolResult {
        let client: SharedClient = mock.clone();
        let tool = ToolDescriptor::from_definition::<T>(client);
        tool.call(ToolRequest::from_value(T::NAME, arguments)).await
    }

    #[tokio::test]
    async fn test_get_issue_truncates_fractional_number() {
        let mock = MockGitHub::returning(json!({ "number": 42 }));
        let result = call::<GetIssueTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "issue_number": 42.0 }),
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(mock.last_request().path(), "/repos/o/r/issues/42");
    }

    #[tokio::test]
    async fn test_get_issue_zero_number_is_missing() {
        let mock = MockGitHub::returning(json!({}));
        let result = call::<GetIssueTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "issue_number": 0 }),
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            Some("missing required parameter: issue_number")
        );
    }

    #[tokio::test]
    async fn test_get_issue_api_error() {
        let mock = MockGitHub::failing(404, "Not Found");
        let result = call::<GetIssueTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "issue_number": 7 }),
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result_text(&result),
            Some("failed to get issue 7: GET /repos/o/r/issues/7 returned 404: Not Found")
        );
    }

    #[tokio::test]
    async fn test_search_issues_adds_qualifier() {
        let mock = MockGitHub::returning(json!({ "items": [] }));
        call::<SearchIssuesTool>(&mock, json!({ "query": "repo:o/r crash" })).await;

        let request = mock.last_request();
        assert_eq!(request.path(), "/search/issues");
        assert_eq!(
            request.query_pairs()[0],
            ("q".to_string(), "is:issue repo:o/r crash".to_string())
        );
    }

    #[tokio::test]
    async fn test_list_issues_joins_labels() {
        let mock = MockGitHub::returning(json!([]));
        call::<ListIssuesTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "state": "open", "labels": ["bug", "p1"] }),
        )
        .await;

        let request = mock.last_request();
        assert!(request
            .query_pairs()
            .contains(&("labels".to_string(), "bug,p1".to_string())));
        assert!(request
            .query_pairs()
            .contains(&("state".to_string(), "open".to_string())));
    }

    #[tokio::test]
    async fn test_list_issues_rejects_non_string_label() {
        let mock = MockGitHub::returning(json!([]));
        let result = call::<ListIssuesTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "labels": ["bug", 3] }),
        )
        .await;

        assert_eq!(
            result_text(&result),
            Some("parameter labels[1] is not of type string, is number")
        );
    }

    #[tokio::test]
    async fn test_create_issue_body() {
        let mock = MockGitHub::returning(json!({ "number": 1 }));
        call::<CreateIssueTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "title": "Bug", "labels": ["bug"] }),
        )
        .await;

        let request = mock.last_request();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(
            request.body(),
            Some(&json!({ "title": "Bug", "assignees": [], "labels": ["bug"] }))
        );
    }

    #[tokio::test]
    async fn test_update_issue_sends_only_given_fields() {
        let mock = MockGitHub::returning(json!({ "number": 3 }));
        call::<UpdateIssueTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "issue_number": 3, "state": "closed", "labels": [] }),
        )
        .await;

        let request = mock.last_request();
        assert_eq!(request.method(), &Method::PATCH);
        assert_eq!(request.path(), "/repos/o/r/issues/3");
        assert_eq!(request.body(), Some(&json!({ "state": "closed", "labels": [] })));
    }

    #[tokio::test]
    async fn test_add_issue_comment() {
        let mock = MockGitHub::returning(json!({ "id": 1 }));
        call::<AddIssueCommentTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "issue_number": 3, "body": "thanks" }),
        )
        .await;

        let request = mock.last_request();
        assert_eq!(request.path(), "/repos/o/r/issues/3/comments");
        assert_eq!(request.body(), Some(&json!({ "body": "thanks" })));
    }
}
