//! Shared pieces of the GitHub tool definitions.

use std::borrow::Cow;

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use crate::core::github::{ApiRequest, GitHubApi};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::params::{ParamResult, ToolRequest, required_param};

/// Repository coordinates taken by most tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RepoParams {
    /// Repository owner
    pub owner: String,

    /// Repository name
    pub repo: String,
}

impl RepoParams {
    pub fn extract(request: &ToolRequest) -> ParamResult<Self> {
        Ok(Self {
            owner: required_param(request, "owner")?,
            repo: required_param(request, "repo")?,
        })
    }

    /// REST path below `/repos/{owner}/{repo}`. `suffix` must already be encoded.
    pub fn path(&self, suffix: &str) -> String {
        format!(
            "/repos/{}/{}{}",
            segment(&self.owner),
            segment(&self.repo),
            suffix
        )
    }
}

/// Percent-encode one caller-supplied path segment.
pub fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Percent-encode a slash-separated path (file paths, branch names),
/// keeping `/` as the separator.
pub fn nested_path(value: &str) -> String {
    value
        .trim_start_matches('/')
        .split('/')
        .map(segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Send a REST request, describing a failure with `action`.
pub async fn send(
    client: &dyn GitHubApi,
    request: ApiRequest,
    action: impl Into<String>,
) -> ToolResult<Value> {
    let action = action.into();
    client
        .send(request)
        .await
        .map_err(|e| ToolError::api(action, e))
}

/// Run a GraphQL query, describing a failure with `action`.
pub async fn graphql(
    client: &dyn GitHubApi,
    query: &str,
    variables: Value,
    action: impl Into<String>,
) -> ToolResult<Value> {
    let action = action.into();
    client
        .graphql(query, variables)
        .await
        .map_err(|e| ToolError::api(action, e))
}

/// Prefix a search query with a qualifier unless it is already present.
pub fn qualified_query(qualifier: &str, query: &str) -> String {
    if query.split_whitespace().any(|term| term == qualifier) {
        query.to_string()
    } else {
        format!("{qualifier} {query}")
    }
}
