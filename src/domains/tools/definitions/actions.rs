//! GitHub Actions: workflows, runs and artifacts.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::info;

use super::common::{RepoParams, segment, send};
use crate::core::github::{ApiRequest, SharedClient};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use crate::domains::tools::pagination::{PaginationParams, optional_pagination_params};
use crate::domains::tools::params::{
    ParamResult, ToolRequest, optional_param, required_int_param, required_param,
};
use crate::domains::tools::toolset::Toolset;

pub const TOOLSET: &str = "actions";

pub fn toolset(client: &SharedClient) -> Toolset {
    Toolset::new(TOOLSET, "GitHub Actions workflows and CI/CD operations").with_tools([
        ToolDescriptor::from_definition::<ListWorkflowsTool>(client.clone()),
        ToolDescriptor::from_definition::<ListWorkflowRunsTool>(client.clone()),
        ToolDescriptor::from_definition::<GetWorkflowRunTool>(client.clone()),
        ToolDescriptor::from_definition::<ListWorkflowRunArtifactsTool>(client.clone()),
        ToolDescriptor::from_definition::<RunWorkflowTool>(client.clone()),
        ToolDescriptor::from_definition::<CancelWorkflowRunTool>(client.clone()),
    ])
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListWorkflowsParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListWorkflowsTool;

impl ToolDefinition for ListWorkflowsTool {
    const NAME: &'static str = "list_workflows";
    const TITLE: &'static str = "List workflows";
    const DESCRIPTION: &'static str = "List workflows in a repository";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListWorkflowsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListWorkflowsParams> {
        Ok(ListWorkflowsParams {
            repo: RepoParams::extract(request)?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: ListWorkflowsParams) -> ToolResult<Value> {
        let request = ApiRequest::get(params.repo.path("/actions/workflows"));
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list workflows",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListWorkflowRunsParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// The workflow ID or workflow file name
    pub workflow_id: String,

    /// Returns someone's workflow runs. Use the login for the user who created the workflow run.
    pub actor: Option<String>,

    /// Returns workflow runs associated with a branch. Use the name of the branch.
    pub branch: Option<String>,

    /// Returns workflow runs for a specific event type
    pub event: Option<String>,

    /// Returns workflow runs with the check run status
    #[schemars(extend("enum" = ["queued", "in_progress", "completed", "requested", "waiting"]))]
    pub status: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListWorkflowRunsTool;

impl ToolDefinition for ListWorkflowRunsTool {
    const NAME: &'static str = "list_workflow_runs";
    const TITLE: &'static str = "List workflow runs";
    const DESCRIPTION: &'static str = "List workflow runs for a specific workflow";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListWorkflowRunsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListWorkflowRunsParams> {
        Ok(ListWorkflowRunsParams {
            repo: RepoParams::extract(request)?,
            workflow_id: required_param(request, "workflow_id")?,
            actor: optional_param(request, "actor")?,
            branch: optional_param(request, "branch")?,
            event: optional_param(request, "event")?,
            status: optional_param(request, "status")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(client: &SharedClient, params: ListWorkflowRunsParams) -> ToolResult<Value> {
        let path = params
            .repo
            .path(&format!("/actions/workflows/{}/runs", segment(&params.workflow_id)));
        let request = ApiRequest::get(path)
            .query_opt("actor", params.actor)
            .query_opt("branch", params.branch)
            .query_opt("event", params.event)
            .query_opt("status", params.status);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list workflow runs",
        )
        .await
    }
}

/// Parameters identifying one workflow run.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WorkflowRunParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// The unique identifier of the workflow run
    pub run_id: i64,
}

impl WorkflowRunParams {
    fn extract(request: &ToolRequest) -> ParamResult<Self> {
        Ok(Self {
            repo: RepoParams::extract(request)?,
            run_id: required_int_param(request, "run_id")?,
        })
    }

    fn path(&self, suffix: &str) -> String {
        self.repo
            .path(&format!("/actions/runs/{}{}", self.run_id, suffix))
    }
}

pub struct GetWorkflowRunTool;

impl ToolDefinition for GetWorkflowRunTool {
    const NAME: &'static str = "get_workflow_run";
    const TITLE: &'static str = "Get workflow run";
    const DESCRIPTION: &'static str = "Get details of a specific workflow run";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = WorkflowRunParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<WorkflowRunParams> {
        WorkflowRunParams::extract(request)
    }

    async fn execute(client: &SharedClient, params: WorkflowRunParams) -> ToolResult<Value> {
        send(
            client.as_ref(),
            ApiRequest::get(params.path("")),
            format!("failed to get workflow run {}", params.run_id),
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListWorkflowRunArtifactsParams {
    #[serde(flatten)]
    pub run: WorkflowRunParams,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListWorkflowRunArtifactsTool;

impl ToolDefinition for ListWorkflowRunArtifactsTool {
    const NAME: &'static str = "list_workflow_run_artifacts";
    const TITLE: &'static str = "List workflow artifacts";
    const DESCRIPTION: &'static str = "List artifacts for a workflow run";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListWorkflowRunArtifactsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListWorkflowRunArtifactsParams> {
        Ok(ListWorkflowRunArtifactsParams {
            run: WorkflowRunParams::extract(request)?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(
        client: &SharedClient,
        params: ListWorkflowRunArtifactsParams,
    ) -> ToolResult<Value> {
        let request = ApiRequest::get(params.run.path("/artifacts"));
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list workflow run artifacts",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RunWorkflowParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// The workflow ID (numeric) or workflow file name (e.g., main.yml, ci.yaml)
    pub workflow_id: String,

    /// The git reference for the workflow. The reference can be a branch or tag name.
    #[serde(rename = "ref")]
    pub git_ref: String,

    /// Inputs the workflow accepts
    pub inputs: Option<JsonObject>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub message: String,
    pub workflow_id: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

pub struct RunWorkflowTool;

impl ToolDefinition for RunWorkflowTool {
    const NAME: &'static str = "run_workflow";
    const TITLE: &'static str = "Run workflow";
    const DESCRIPTION: &'static str = "Run an Actions workflow by workflow ID or filename";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = RunWorkflowParams;
    type Context = SharedClient;
    type Output = DispatchOutcome;

    fn extract(request: &ToolRequest) -> ParamResult<RunWorkflowParams> {
        Ok(RunWorkflowParams {
            repo: RepoParams::extract(request)?,
            workflow_id: required_param(request, "workflow_id")?,
            git_ref: required_param(request, "ref")?,
            inputs: optional_param(request, "inputs")?,
        })
    }

    async fn execute(client: &SharedClient, params: RunWorkflowParams) -> ToolResult<DispatchOutcome> {
        let path = params
            .repo
            .path(&format!(
                "/actions/workflows/{}/dispatches",
                segment(&params.workflow_id)
            ));
        let body = json!({
            "ref": params.git_ref,
            "inputs": params.inputs.unwrap_or_else(Map::new),
        });
        send(
            client.as_ref(),
            ApiRequest::post(path).json(body),
            "failed to run workflow",
        )
        .await?;

        info!(workflow = %params.workflow_id, git_ref = %params.git_ref, "Workflow dispatched");
        Ok(DispatchOutcome {
            message: "Workflow run has been queued".to_string(),
            workflow_id: params.workflow_id,
            git_ref: params.git_ref,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelOutcome {
    pub message: String,
    pub run_id: i64,
}

pub struct CancelWorkflowRunTool;

impl ToolDefinition for CancelWorkflowRunTool {
    const NAME: &'static str = "cancel_workflow_run";
    const TITLE: &'static str = "Cancel workflow run";
    const DESCRIPTION: &'static str = "Cancel a workflow run";
    const ACCESS: ToolAccess = ToolAccess::Write;

    type Params = WorkflowRunParams;
    type Context = SharedClient;
    type Output = CancelOutcome;

    fn extract(request: &ToolRequest) -> ParamResult<WorkflowRunParams> {
        WorkflowRunParams::extract(request)
    }

    async fn execute(client: &SharedClient, params: WorkflowRunParams) -> ToolResult<CancelOutcome> {
        send(
            client.as_ref(),
            ApiRequest::post(params.path("/cancel")),
            format!("failed to cancel workflow run {}", params.run_id),
        )
        .await?;

        Ok(CancelOutcome {
            message: "Workflow run has been cancelled".to_string(),
            run_id: params.run_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::github::mock::MockGitHub;
    use crate::domains::tools::result::result_text;
    use reqwest::Method;

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
    async fn test_list_workflow_runs_filters() {
        let mock = MockGitHub::returning(json!({ "workflow_runs": [] }));
        call::<ListWorkflowRunsTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "workflow_id": "ci.yml", "branch": "main" }),
        )
        .await;

        let request = mock.last_request();
        assert_eq!(request.path(), "/repos/o/r/actions/workflows/ci.yml/runs");
        assert_eq!(request.query_pairs()[0], ("branch".to_string(), "main".to_string()));
    }

    #[tokio::test]
    async fn test_get_workflow_run_requires_run_id() {
        let mock = MockGitHub::returning(json!({}));
        let result = call::<GetWorkflowRunTool>(&mock, json!({ "owner": "o", "repo": "r" })).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), Some("missing required parameter: run_id"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_run_workflow_defaults_inputs() {
        let mock = MockGitHub::returning(Value::Null);
        let result = call::<RunWorkflowTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "workflow_id": "deploy.yml", "ref": "main" }),
        )
        .await;

        let request = mock.last_request();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/repos/o/r/actions/workflows/deploy.yml/dispatches");
        assert_eq!(request.body(), Some(&json!({ "ref": "main", "inputs": {} })));

        let outcome: Value = serde_json::from_str(result_text(&result).unwrap()).unwrap();
        assert_eq!(outcome["message"], "Workflow run has been queued");
        assert_eq!(outcome["ref"], "main");
    }

    #[tokio::test]
    async fn test_cancel_workflow_run_failure() {
        let mock = MockGitHub::failing(409, "Cannot cancel a workflow run that is completed.");
        let result = call::<CancelWorkflowRunTool>(
            &mock,
            json!({ "owner": "o", "repo": "r", "run_id": 7 }),
        )
        .await;

        assert_eq!(
            result_text(&result),
            Some(
                "failed to cancel workflow run 7: POST /repos/o/r/actions/runs/7/cancel returned 409: Cannot cancel a workflow run that is completed."
            )
        );
    }
}
