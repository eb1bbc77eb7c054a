//! Notification inbox tools.

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
};
use crate::domains::tools::toolset::Toolset;

pub const TOOLSET: &str = "notifications";

pub fn toolset(client: &SharedClient) -> Toolset {
    Toolset::new(TOOLSET, "GitHub Notifications related tools").with_tools([
        ToolDescriptor::from_definition::<ListNotificationsTool>(client.clone()),
        ToolDescriptor::from_definition::<MarkAllNotificationsReadTool>(client.clone()),
    ])
}

/// Optional repository scope. Both halves must be given for it to apply.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct OptionalRepoParams {
    /// Optional repository owner. If provided with repo, only notifications for this repository are listed.
    pub owner: Option<String>,

    /// Optional repository name. If provided with owner, only notifications for this repository are listed.
    pub repo: Option<String>,
}

impl OptionalRepoParams {
    fn extract(request: &ToolRequest) -> ParamResult<Self> {
        Ok(Self {
            owner: optional_param(request, "owner")?,
            repo: optional_param(request, "repo")?,
        })
    }

    fn scope(&self) -> Option<RepoParams> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Some(RepoParams {
                    owner: owner.clone(),
                    repo: repo.clone(),
                })
            }
            _ => None,
        }
    }

    fn notifications_path(&self) -> String {
        match self.scope() {
            Some(repo) => repo.path("/notifications"),
            None => "/notifications".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListNotificationsParams {
    /// Include all notifications, not just unread ones
    #[serde(default)]
    pub all: bool,

    /// Only include notifications in which the user is directly participating
    #[serde(default)]
    pub participating: bool,

    /// Only show notifications updated after this timestamp (ISO 8601 format)
    pub since: Option<String>,

    /// Only show notifications updated before this timestamp (ISO 8601 format)
    pub before: Option<String>,

    #[serde(flatten)]
    pub repo: OptionalRepoParams,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListNotificationsTool;

impl ToolDefinition for ListNotificationsTool {
    const NAME: &'static str = "list_notifications";
    const TITLE: &'static str = "List notifications";
    const DESCRIPTION: &'static str = "List GitHub notifications for the authenticated user";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListNotificationsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListNotificationsParams> {
        Ok(ListNotificationsParams {
            all: optional_bool_param_with_default(request, "all", false)?,
            participating: optional_bool_param_with_default(request, "participating", false)?,
            since: optional_param(request, "since")?,
            before: optional_param(request, "before")?,
            repo: OptionalRepoParams::extract(request)?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: ListNotificationsParams) -> ToolResult<Value> {
        let request = ApiRequest::get(params.repo.notifications_path())
            .query("all", params.all)
            .query("participating", params.participating)
            .query_opt("since", params.since)
            .query_opt("before", params.before);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list notifications",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MarkAllNotificationsReadParams {
    /// Describes the last point that notifications were checked (optional). Default: Now
    pub last_read_at: Option<String>,

    #[serde(flatten)]
    pub repo: OptionalRepoParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkReadOutcome {
    pub message: String,
}

pub struct MarkAllNotificationsReadTool;

impl ToolDefinition for MarkAllNotificationsReadTool {
    const NAME: &'static str = "mark_all_notifications_read";
    const TITLE: &'static str = "Mark all notifications as read";
    const DESCRIPTION: &'static str = "Mark all notifications as read";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = MarkAllNotificationsReadParams;
    type Context = SharedClient;
    type Output = MarkReadOutcome;

    fn extract(request: &ToolRequest) -> ParamResult<MarkAllNotificationsReadParams> {
        Ok(MarkAllNotificationsReadParams {
            last_read_at: optional_param(request, "last_read_at")?,
            repo: OptionalRepoParams::extract(request)?,
        })
    }

    async fn execute(
        client: &SharedClient,
        params: MarkAllNotificationsReadParams,
    ) -> ToolResult<MarkReadOutcome> {
        let mut body = Map::new();
        if let Some(at) = params.last_read_at.filter(|at| !at.is_empty()) {
            body.insert("last_read_at".to_string(), Value::from(at));
        }

        send(
            client.as_ref(),
            ApiRequest::put(params.repo.notifications_path()).json(Value::Object(body)),
            "failed to mark all notifications as read",
        )
        .await?;

        Ok(MarkReadOutcome {
            message: "All notifications marked as read".to_string(),
        })
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
        ToolDescriptor::from_definition::<T>(client)
            .call(ToolRequest::from_value(T::NAME, arguments))
            .await
    }

    #[tokio::test]
    async fn test_list_notifications_defaults() {
        let mock = MockGitHub::returning(json!([]));
        call::<ListNotificationsTool>(&mock, json!({})).await;

        let request = mock.last_request();
        assert_eq!(request.path(), "/notifications");
        assert_eq!(
            request.query_pairs()[..2],
            [
                ("all".to_string(), "false".to_string()),
                ("participating".to_string(), "false".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_list_notifications_repo_scope() {
        let mock = MockGitHub::returning(json!([]));
        call::<ListNotificationsTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "all": true }),
        )
        .await;

        let request = mock.last_request();
        assert_eq!(request.path(), "/repos/o/r/notifications");
        assert_eq!(request.query_pairs()[0], ("all".to_string(), "true".to_string()));
    }

    #[tokio::test]
    async fn test_owner_alone_stays_global() {
        let mock = MockGitHub::returning(json!([]));
        call::<ListNotificationsTool>(&mock, json!({ "owner": "o" })).await;
        assert_eq!(mock.last_request().path(), "/notifications");
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let mock = MockGitHub::returning(Value::Null);
        let result = call::<MarkAllNotificationsReadTool>(
            &mock,
            json!({ "last_read_at": "2024-01-01T00:00:00Z" }),
        )
        .await;

        let request = mock.last_request();
        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(
            request.body(),
            Some(&json!({ "last_read_at": "2024-01-01T00:00:00Z" }))
        );
        assert_eq!(
            result_text(&result),
            Some(r#"{"message":"All notifications marked as read"}"#)
        );
    }
}
