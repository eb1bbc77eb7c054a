//! Pull request tools.

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use super::common::{RepoParams, send};
use crate::core::github::{ApiRequest, SharedClient};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use crate::domains::tools::pagination::{PaginationParams, optional_pagination_params};
use crate::domains::tools::params::{
    ParamResult, ToolRequest, optional_bool_param_with_default, optional_param,
    required_int_param, required_param,
};
use crate::domains::tools::toolset::Toolset;

pub const TOOLSET: &str = "pull_requests";

pub fn toolset(client: &SharedClient) -> Toolset {
    Toolset::new(TOOLSET, "GitHub Pull Request related tools").with_tools([
        ToolDescriptor::from_definition::<GetPullRequestTool>(client.clone()),
        ToolDescriptor::from_definition::<ListPullRequestsTool>(client.clone()),
        ToolDescriptor::from_definition::<GetPullRequestFilesTool>(client.clone()),
        ToolDescriptor::from_definition::<CreatePullRequestTool>(client.clone()),
        ToolDescriptor::from_definition::<MergePullRequestTool>(client.clone()),
    ])
}

/// Parameters identifying one pull request.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PullRequestParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Pull request number
    pub pull_number: i64,
}

impl PullRequestParams {
    fn extract(request: &ToolRequest) -> ParamResult<Self> {
        Ok(Self {
            repo: RepoParams::extract(request)?,
            pull_number: required_int_param(request, "pull_number")?,
        })
    }

    fn path(&self, suffix: &str) -> String {
        self.repo.path(&format!("/pulls/{}{}", self.pull_number, suffix))
    }
}

pub struct GetPullRequestTool;

impl ToolDefinition for GetPullRequestTool {
    const NAME: &'static str = "get_pull_request";
    const TITLE: &'static str = "Get pull request details";
    const DESCRIPTION: &'static str = "Get details of a specific pull request in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = PullRequestParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<PullRequestParams> {
        PullRequestParams::extract(request)
    }

    async fn execute(client: &SharedClient, params: PullRequestParams) -> ToolResult<Value> {
        send(
            client.as_ref(),
            ApiRequest::get(params.path("")),
            format!("failed to get pull request {}", params.pull_number),
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListPullRequestsParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Filter by state
    #[schemars(extend("enum" = ["open", "closed", "all"]))]
    pub state: Option<String>,

    /// Filter by head user/org and branch
    pub head: Option<String>,

    /// Filter by base branch
    pub base: Option<String>,

    /// Sort by
    #[schemars(extend("enum" = ["created", "updated", "popularity", "long-running"]))]
    pub sort: Option<String>,

    /// Sort direction
    #[schemars(extend("enum" = ["asc", "desc"]))]
    pub direction: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListPullRequestsTool;

impl ToolDefinition for ListPullRequestsTool {
    const NAME: &'static str = "list_pull_requests";
    const TITLE: &'static str = "List pull requests";
    const DESCRIPTION: &'static str = "List pull requests in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListPullRequestsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListPullRequestsParams> {
        Ok(ListPullRequestsParams {
            repo: RepoParams::extract(request)?,
            state: optional_param(request, "state")?,
            head: optional_param(request, "head")?,
            base: optional_param(request, "base")?,
            sort: optional_param(request, "sort")?,
            direction: optional_param(request, "direction")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: ListPullRequestsParams) -> ToolResult<Value> {
        let request = ApiRequest::get(params.repo.path("/pulls"))
            .query_opt("state", params.state)
            .query_opt("head", params.head)
            .query_opt("base", params.base)
            .query_opt("sort", params.sort)
            .query_opt("direction", params.direction);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list pull requests",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetPullRequestFilesParams {
    #[serde(flatten)]
    pub pull_request: PullRequestParams,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct GetPullRequestFilesTool;

impl ToolDefinition for GetPullRequestFilesTool {
    const NAME: &'static str = "get_pull_request_files";
    const TITLE: &'static str = "Get pull request files";
    const DESCRIPTION: &'static str = "Get the files changed in a specific pull request.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = GetPullRequestFilesParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<GetPullRequestFilesParams> {
        Ok(GetPullRequestFilesParams {
            pull_request: PullRequestParams::extract(request)?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: GetPullRequestFilesParams) -> ToolResult<Value> {
        let request = params
            .pagination
            .apply(ApiRequest::get(params.pull_request.path("/files")));
        send(client.as_ref(), request, "failed to get pull request files").await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CreatePullRequestParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// PR title
    pub title: String,

    /// Branch containing changes
    pub head: String,

    /// Branch to merge into
    pub base: String,

    /// PR description
    pub body: Option<String>,

    /// Create as draft PR
    #[serde(default)]
    pub draft: bool,

    /// Allow maintainer edits
    pub maintainer_can_modify: Option<bool>,
}

pub struct CreatePullRequestTool;

impl ToolDefinition for CreatePullRequestTool {
    const NAME: &'static str = "create_pull_request";
    const TITLE: &'static str = "Open new pull request";
    const DESCRIPTION: &'static str = "Create a new pull request in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = CreatePullRequestParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<CreatePullRequestParams> {
        Ok(CreatePullRequestParams {
            repo: RepoParams::extract(request)?,
            title: required_param(request, "title")?,
            head: required_param(request, "head")?,
            base: required_param(request, "base")?,
            body: optional_param(request, "body")?,
            draft: optional_bool_param_with_default(request, "draft", false)?,
            maintainer_can_modify: optional_param(request, "maintainer_can_modify")?,
        })
    }

    async fn execute(client: &SharedClient, params: CreatePullRequestParams) -> ToolResult<Value> {
        let mut body = Map::new();
        body.insert("title".to_string(), Value::from(params.title));
        body.insert("head".to_string(), Value::from(params.head));
        body.insert("base".to_string(), Value::from(params.base));
        body.insert("draft".to_string(), Value::from(params.draft));
        if let Some(text) = params.body {
            body.insert("body".to_string(), Value::from(text));
        }
        if let Some(allowed) = params.maintainer_can_modify {
            body.insert("maintainer_can_modify".to_string(), Value::from(allowed));
        }

        send(
            client.as_ref(),
            ApiRequest::post(params.repo.path("/pulls")).json(Value::Object(body)),
            "failed to create pull request",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MergePullRequestParams {
    #[serde(flatten)]
    pub pull_request: PullRequestParams,

    /// Title for merge commit
    pub commit_title: Option<String>,

    /// Extra detail for merge commit
    pub commit_message: Option<String>,

    /// Merge method
    #[schemars(extend("enum" = ["merge", "squash", "rebase"]))]
    pub merge_method: Option<String>,
}

pub struct MergePullRequestTool;

impl ToolDefinition for MergePullRequestTool {
    const NAME: &'static str = "merge_pull_request";
    const TITLE: &'static str = "Merge pull request";
    const DESCRIPTION: &'static str = "Merge a pull request in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = MergePullRequestParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<MergePullRequestParams> {
        Ok(MergePullRequestParams {
            pull_request: PullRequestParams::extract(request)?,
            commit_title: optional_param(request, "commit_title")?,
            commit_message: optional_param(request, "commit_message")?,
            merge_method: optional_param(request, "merge_method")?,
        })
    }

    async fn execute(client: &SharedClient, params: MergePullRequestParams) -> ToolResult<Value> {
        let mut body = Map::new();
        let fields = [
            ("commit_title", params.commit_title),
            ("commit_message", params.commit_message),
            ("merge_method", params.merge_method),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                body.insert(key.to_string(), Value::from(value));
            }
        }

        send(
            client.as_ref(),
            ApiRequest::put(params.pull_request.path("/merge")).json(Value::Object(body)),
            format!("failed to merge pull request {}", params.pull_request.pull_number),
        )
        .await
    }
}
