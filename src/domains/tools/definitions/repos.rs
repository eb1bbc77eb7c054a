//! Repository tools: commits, branches, file contents and search.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::common::{RepoParams, nested_path, segment, send};
use crate::core::github::{ApiRequest, SharedClient};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use crate::domains::tools::pagination::{PaginationParams, optional_pagination_params};
use crate::domains::tools::params::{
    ParamResult, ToolRequest, optional_bool_param_with_default, optional_param, required_param,
};
use crate::domains::tools::toolset::Toolset;

pub const TOOLSET: &str = "repos";

pub fn toolset(client: &SharedClient) -> Toolset {
    Toolset::new(TOOLSET, "GitHub Repository related tools").with_tools([
        ToolDescriptor::from_definition::<GetCommitTool>(client.clone()),
        ToolDescriptor::from_definition::<ListCommitsTool>(client.clone()),
        ToolDescriptor::from_definition::<SearchRepositoriesTool>(client.clone()),
        ToolDescriptor::from_definition::<GetFileContentsTool>(client.clone()),
        ToolDescriptor::from_definition::<ListBranchesTool>(client.clone()),
        ToolDescriptor::from_definition::<CreateBranchTool>(client.clone()),
        ToolDescriptor::from_definition::<CreateOrUpdateFileTool>(client.clone()),
    ])
}

// ============================================================================
// get_commit
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetCommitParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Commit SHA, branch name, or tag name
    pub sha: String,

    /// Whether to include file diffs and stats in the response
    #[serde(default = "include_diff_default")]
    pub include_diff: bool,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

fn include_diff_default() -> bool {
    true
}

pub struct GetCommitTool;

impl ToolDefinition for GetCommitTool {
    const NAME: &'static str = "get_commit";
    const TITLE: &'static str = "Get commit details";
    const DESCRIPTION: &'static str = "Get details for a commit from a GitHub repository";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = GetCommitParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<GetCommitParams> {
        Ok(GetCommitParams {
            repo: RepoParams::extract(request)?,
            sha: required_param(request, "sha")?,
            include_diff: optional_bool_param_with_default(request, "include_diff", include_diff_default())?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: GetCommitParams) -> ToolResult<Value> {
        let path = params.repo.path(&format!("/commits/{}", segment(&params.sha)));
        let request = params.pagination.apply(ApiRequest::get(path));
        let mut commit = send(
            client.as_ref(),
            request,
            format!("failed to get commit {}", params.sha),
        )
        .await?;

        if !params.include_diff
            && let Some(files) = commit.get_mut("files").and_then(Value::as_array_mut)
        {
            for file in files.iter_mut().filter_map(Value::as_object_mut) {
                file.remove("patch");
            }
        }
        Ok(commit)
    }
}

// ============================================================================
// list_commits
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListCommitsParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Commit SHA, branch or tag name to list commits of
    pub sha: Option<String>,

    /// Author username or email address to filter commits by
    pub author: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListCommitsTool;

impl ToolDefinition for ListCommitsTool {
    const NAME: &'static str = "list_commits";
    const TITLE: &'static str = "List commits";
    const DESCRIPTION: &'static str = "Get list of commits of a branch in a GitHub repository. Returns at least 30 results per page by default, but can return more if specified using the perPage parameter (up to 100).";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListCommitsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListCommitsParams> {
        Ok(ListCommitsParams {
            repo: RepoParams::extract(request)?,
            sha: optional_param(request, "sha")?,
            author: optional_param(request, "author")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: ListCommitsParams) -> ToolResult<Value> {
        let request = ApiRequest::get(params.repo.path("/commits"))
            .query_opt("sha", params.sha)
            .query_opt("author", params.author);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list commits",
        )
        .await
    }
}

// ============================================================================
// search_repositories
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchRepositoriesParams {
    /// Search query
    pub query: String,

    /// Sort field
    #[schemars(extend("enum" = ["stars", "forks", "help-wanted-issues", "updated"]))]
    pub sort: Option<String>,

    /// Sort order
    #[schemars(extend("enum" = ["asc", "desc"]))]
    pub order: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct SearchRepositoriesTool;

impl ToolDefinition for SearchRepositoriesTool {
    const NAME: &'static str = "search_repositories";
    const TITLE: &'static str = "Search repositories";
    const DESCRIPTION: &'static str = "Search for GitHub repositories";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = SearchRepositoriesParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<SearchRepositoriesParams> {
        Ok(SearchRepositoriesParams {
            query: required_param(request, "query")?,
            sort: optional_param(request, "sort")?,
            order: optional_param(request, "order")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: SearchRepositoriesParams) -> ToolResult<Value> {
        let request = ApiRequest::get("/search/repositories")
            .query("q", &params.query)
            .query_opt("sort", params.sort)
            .query_opt("order", params.order);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to search repositories",
        )
        .await
    }
}

// ============================================================================
// get_file_contents
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetFileContentsParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Path to file or directory
    pub path: String,

    /// Branch name, tag, or commit SHA
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

pub struct GetFileContentsTool;

impl ToolDefinition for GetFileContentsTool {
    const NAME: &'static str = "get_file_contents";
    const TITLE: &'static str = "Get file or directory contents";
    const DESCRIPTION: &'static str = "Get the contents of a file or directory from a GitHub repository";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = GetFileContentsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<GetFileContentsParams> {
        Ok(GetFileContentsParams {
            repo: RepoParams::extract(request)?,
            path: required_param(request, "path")?,
            git_ref: optional_param(request, "ref")?,
        })
    }

    #[instrument(skip_all, fields(path = %params.path))]
    async fn execute(client: &SharedClient, params: GetFileContentsParams) -> ToolResult<Value> {
        let path = params
            .repo
            .path(&format!("/contents/{}", nested_path(&params.path)));
        let request = ApiRequest::get(path).query_opt("ref", params.git_ref);
        let contents = send(
            client.as_ref(),
            request,
            format!("failed to get file contents for {}", params.path),
        )
        .await?;

        Ok(match contents {
            Value::Array(entries) => json!({
                "files": entries.iter().map(directory_entry).collect::<Vec<_>>()
            }),
            Value::Object(mut file) => {
                decode_content(&mut file);
                Value::Object(file)
            }
            other => other,
        })
    }
}

fn directory_entry(entry: &Value) -> Value {
    json!({
        "name": entry.get("name"),
        "path": entry.get("path"),
        "type": entry.get("type"),
        "size": entry.get("size"),
        "download_url": entry.get("download_url"),
    })
}

/// Replace base64 `content` with its text when it decodes to UTF-8.
fn decode_content(file: &mut serde_json::Map<String, Value>) {
    if file.get("encoding").and_then(Value::as_str) != Some("base64") {
        return;
    }
    let Some(encoded) = file.get("content").and_then(Value::as_str) else {
        return;
    };

    let compact: String = encoded.split_whitespace().collect();
    match STANDARD.decode(compact) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => {
                file.insert("content".to_string(), Value::String(text));
                file.insert("encoding".to_string(), Value::String("utf-8".to_string()));
            }
            Err(_) => debug!("File content is binary; leaving it base64 encoded"),
        },
        Err(e) => debug!("Failed to decode file content: {}", e),
    }
}

// ============================================================================
// list_branches
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListBranchesParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListBranchesTool;

impl ToolDefinition for ListBranchesTool {
    const NAME: &'static str = "list_branches";
    const TITLE: &'static str = "List branches";
    const DESCRIPTION: &'static str = "List branches in a GitHub repository";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListBranchesParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListBranchesParams> {
        Ok(ListBranchesParams {
            repo: RepoParams::extract(request)?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: ListBranchesParams) -> ToolResult<Value> {
        let request = params
            .pagination
            .apply(ApiRequest::get(params.repo.path("/branches")));
        send(client.as_ref(), request, "failed to list branches").await
    }
}

// ============================================================================
// create_branch
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CreateBranchParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Name for new branch
    pub branch: String,

    /// Source branch (defaults to repo default)
    pub from_branch: Option<String>,
}

pub struct CreateBranchTool;

impl ToolDefinition for CreateBranchTool {
    const NAME: &'static str = "create_branch";
    const TITLE: &'static str = "Create branch";
    const DESCRIPTION: &'static str = "Create a new branch in a GitHub repository";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = CreateBranchParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<CreateBranchParams> {
        Ok(CreateBranchParams {
            repo: RepoParams::extract(request)?,
            branch: required_param(request, "branch")?,
            from_branch: optional_param(request, "from_branch")?,
        })
    }

    async fn execute(client: &SharedClient, params: CreateBranchParams) -> ToolResult<Value> {
        let client = client.as_ref();

        let from_branch = match params.from_branch.filter(|b| !b.is_empty()) {
            Some(branch) => branch,
            None => {
                let repository = send(
                    client,
                    ApiRequest::get(params.repo.path("")),
                    "failed to get repository",
                )
                .await?;
                repository
                    .get("default_branch")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| ToolError::internal("repository has no default branch"))?
            }
        };

        let reference = send(
            client,
            ApiRequest::get(
                params
                    .repo
                    .path(&format!("/git/ref/heads/{}", nested_path(&from_branch))),
            ),
            "failed to get reference",
        )
        .await?;
        let sha = reference
            .pointer("/object/sha")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::internal(format!("reference {from_branch} has no commit sha")))?;

        info!(branch = %params.branch, from = %from_branch, "Creating branch");
        let body = json!({ "ref": format!("refs/heads/{}", params.branch), "sha": sha });
        send(
            client,
            ApiRequest::post(params.repo.path("/git/refs")).json(body),
            "failed to create branch",
        )
        .await
    }
}

// ============================================================================
// create_or_update_file
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CreateOrUpdateFileParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Path where to create/update the file
    pub path: String,

    /// Content of the file
    pub content: String,

    /// Commit message
    pub message: String,

    /// Branch to create/update the file in
    pub branch: String,

    /// Required if updating an existing file. The blob SHA of the file being replaced.
    pub sha: Option<String>,
}

pub struct CreateOrUpdateFileTool;

impl ToolDefinition for CreateOrUpdateFileTool {
    const NAME: &'static str = "create_or_update_file";
    const TITLE: &'static str = "Create or update file";
    const DESCRIPTION: &'static str = "Create or update a single file in a GitHub repository. If updating, you must provide the SHA of the file you want to update.";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = CreateOrUpdateFileParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<CreateOrUpdateFileParams> {
        Ok(CreateOrUpdateFileParams {
            repo: RepoParams::extract(request)?,
            path: required_param(request, "path")?,
            content: required_param(request, "content")?,
            message: required_param(request, "message")?,
            branch: required_param(request, "branch")?,
            sha: optional_param(request, "sha")?,
        })
    }

    async fn execute(client: &SharedClient, params: CreateOrUpdateFileParams) -> ToolResult<Value> {
        let mut body = json!({
            "message": params.message,
            "content": STANDARD.encode(params.content.as_bytes()),
            "branch": params.branch,
        });
        if let Some(sha) = params.sha {
            body["sha"] = Value::String(sha);
        }

        let path = params
            .repo
            .path(&format!("/contents/{}", nested_path(&params.path)));
        send(
            client.as_ref(),
            ApiRequest::put(path).json(body),
            "failed to create/update file",
        )
        .await
    }
}
