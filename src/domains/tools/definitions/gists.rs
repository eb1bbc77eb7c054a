//! Gist tools.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value, json};

use super::common::{segment, send};
use crate::core::github::{ApiRequest, SharedClient};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use crate::domains::tools::pagination::{PaginationParams, optional_pagination_params};
use crate::domains::tools::params::{
    ParamResult, ToolRequest, optional_bool_param_with_default, optional_param,
    required_string_map_param,
};
use crate::domains::tools::toolset::Toolset;

pub const TOOLSET: &str = "gists";

pub fn toolset(client: &SharedClient) -> Toolset {
    Toolset::new(TOOLSET, "GitHub Gist related tools").with_tools([
        ToolDescriptor::from_definition::<ListGistsTool>(client.clone()),
        ToolDescriptor::from_definition::<CreateGistTool>(client.clone()),
    ])
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListGistsParams {
    /// GitHub username (omit for the authenticated user's gists)
    pub username: Option<String>,

    /// Only show gists updated after this timestamp (ISO 8601 format)
    pub since: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListGistsTool;

impl ToolDefinition for ListGistsTool {
    const NAME: &'static str = "list_gists";
    const TITLE: &'static str = "List gists";
    const DESCRIPTION: &'static str = "List GitHub gists for the authenticated user";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListGistsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListGistsParams> {
        Ok(ListGistsParams {
            username: optional_param(request, "username")?,
            since: optional_param(request, "since")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: ListGistsParams) -> ToolResult<Value> {
        let path = match params.username.as_deref() {
            Some(user) if !user.is_empty() => format!("/users/{}/gists", segment(user)),
            _ => "/gists".to_string(),
        };
        let request = ApiRequest::get(path).query_opt("since", params.since);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list gists",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CreateGistParams {
    /// Files to include in the gist, keyed by filename
    pub files: BTreeMap<String, String>,

    /// Description of the gist
    pub description: Option<String>,

    /// Whether the gist should be public
    #[serde(default)]
    pub public: bool,
}

pub struct CreateGistTool;

impl ToolDefinition for CreateGistTool {
    const NAME: &'static str = "create_gist";
    const TITLE: &'static str = "Create Gist";
    const DESCRIPTION: &'static str = "Create a new GitHub gist";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = CreateGistParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<CreateGistParams> {
        Ok(CreateGistParams {
            files: required_string_map_param(request, "files")?,
            description: optional_param(request, "description")?,
            public: optional_bool_param_with_default(request, "public", false)?,
        })
    }

    async fn execute(client: &SharedClient, params: CreateGistParams) -> ToolResult<Value> {
        let files: Map<String, Value> = params
            .files
            .into_iter()
            .map(|(name, content)| (name, json!({ "content": content })))
            .collect();
        let body = json!({
            "files": files,
            "description": params.description.unwrap_or_default(),
            "public": params.public,
        });

        send(
            client.as_ref(),
            ApiRequest::post("/gists").json(body),
            "failed to create gist",
        )
        .await
    }
}
