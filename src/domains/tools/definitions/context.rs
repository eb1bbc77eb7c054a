//! Context tools: information about the authenticated user.

use serde_json::Value;
use tracing::info;

use super::common::send;
use crate::core::github::{ApiRequest, SharedClient};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use crate::domains::tools::params::{NoParams, ParamResult, ToolRequest};
use crate::domains::tools::toolset::Toolset;

pub const TOOLSET: &str = "context";

pub fn toolset(client: &SharedClient) -> Toolset {
    Toolset::new(
        TOOLSET,
        "Tools that provide context about the current user and GitHub context you are operating in",
    )
    .with_tool(ToolDescriptor::from_definition::<GetMeTool>(client.clone()))
}

/// Returns the authenticated user's profile.
pub struct GetMeTool;

impl ToolDefinition for GetMeTool {
    const NAME: &'static str = "get_me";
    const TITLE: &'static str = "Get my user profile";
    const DESCRIPTION: &'static str = "Get details of the authenticated GitHub user. Use this when a request is about the user's own profile for GitHub. Or when information is missing to build other tool calls.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = NoParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(_request: &ToolRequest) -> ParamResult<NoParams> {
        Ok(NoParams {})
    }

    async fn execute(client: &SharedClient, _params: NoParams) -> ToolResult<Value> {
        info!("Fetching authenticated user");
        send(client.as_ref(), ApiRequest::get("/user"), "failed to get user").await
    }
}
