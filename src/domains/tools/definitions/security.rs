//! Security tooling: code scanning, secret scanning, Dependabot and the
//! global advisory database.
//!
//! The three alert families share one repository layout
//! (`/repos/{owner}/{repo}/{family}/alerts[/{number}]`), so single-alert
//! lookups go through one generic tool parameterized by [`AlertSource`].

use std::marker::PhantomData;

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use super::common::{RepoParams, segment, send};
use crate::core::github::{ApiRequest, SharedClient};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{ToolAccess, ToolDefinition, ToolDescriptor};
use crate::domains::tools::pagination::{PaginationParams, optional_pagination_params};
use crate::domains::tools::params::{
    ParamResult, ToolRequest, optional_param, required_int_param, required_param,
};
use crate::domains::tools::toolset::Toolset;

pub const CODE_SECURITY_TOOLSET: &str = "code_security";
pub const SECRET_PROTECTION_TOOLSET: &str = "secret_protection";
pub const DEPENDABOT_TOOLSET: &str = "dependabot";
pub const SECURITY_ADVISORIES_TOOLSET: &str = "security_advisories";

pub fn code_security_toolset(client: &SharedClient) -> Toolset {
    Toolset::new(CODE_SECURITY_TOOLSET, "Code security related tools").with_tools([
        ToolDescriptor::from_definition::<GetAlertTool<CodeScanning>>(client.clone()),
        ToolDescriptor::from_definition::<ListCodeScanningAlertsTool>(client.clone()),
    ])
}

pub fn secret_protection_toolset(client: &SharedClient) -> Toolset {
    Toolset::new(SECRET_PROTECTION_TOOLSET, "Secret protection related tools").with_tools([
        ToolDescriptor::from_definition::<GetAlertTool<SecretScanning>>(client.clone()),
        ToolDescriptor::from_definition::<ListSecretScanningAlertsTool>(client.clone()),
    ])
}

pub fn dependabot_toolset(client: &SharedClient) -> Toolset {
    Toolset::new(DEPENDABOT_TOOLSET, "Dependabot tools").with_tools([
        ToolDescriptor::from_definition::<GetAlertTool<Dependabot>>(client.clone()),
        ToolDescriptor::from_definition::<ListDependabotAlertsTool>(client.clone()),
    ])
}

pub fn security_advisories_toolset(client: &SharedClient) -> Toolset {
    Toolset::new(SECURITY_ADVISORIES_TOOLSET, "Security advisories related tools").with_tools([
        ToolDescriptor::from_definition::<ListGlobalSecurityAdvisoriesTool>(client.clone()),
        ToolDescriptor::from_definition::<GetGlobalSecurityAdvisoryTool>(client.clone()),
    ])
}

// ============================================================================
// Alert families
// ============================================================================

/// One family of repository alerts.
pub trait AlertSource: Send + Sync + 'static {
    /// Name of the single-alert tool.
    const TOOL_NAME: &'static str;
    const TITLE: &'static str;
    const DESCRIPTION: &'static str;
    /// Path segment below the repository, e.g. `code-scanning`.
    const SEGMENT: &'static str;
    /// Noun used in failure messages.
    const NOUN: &'static str;
}

pub struct CodeScanning;

impl AlertSource for CodeScanning {
    const TOOL_NAME: &'static str = "get_code_scanning_alert";
    const TITLE: &'static str = "Get code scanning alert";
    const DESCRIPTION: &'static str = "Get details of a specific code scanning alert in a GitHub repository.";
    const SEGMENT: &'static str = "code-scanning";
    const NOUN: &'static str = "code scanning alert";
}

pub struct SecretScanning;

impl AlertSource for SecretScanning {
    const TOOL_NAME: &'static str = "get_secret_scanning_alert";
    const TITLE: &'static str = "Get secret scanning alert";
    const DESCRIPTION: &'static str = "Get details of a specific secret scanning alert in a GitHub repository.";
    const SEGMENT: &'static str = "secret-scanning";
    const NOUN: &'static str = "secret scanning alert";
}

pub struct Dependabot;

impl AlertSource for Dependabot {
    const TOOL_NAME: &'static str = "get_dependabot_alert";
    const TITLE: &'static str = "Get dependabot alert";
    const DESCRIPTION: &'static str = "Get details of a specific dependabot alert in a GitHub repository.";
    const SEGMENT: &'static str = "dependabot";
    const NOUN: &'static str = "dependabot alert";
}

fn alerts_path(repo: &RepoParams, segment: &str) -> String {
    repo.path(&format!("/{segment}/alerts"))
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetAlertParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// The number of the alert.
    pub alert_number: i64,
}

/// Fetches one alert of the family `S`.
pub struct GetAlertTool<S>(PhantomData<S>);

impl<S: AlertSource> ToolDefinition for GetAlertTool<S> {
    const NAME: &'static str = S::TOOL_NAME;
    const TITLE: &'static str = S::TITLE;
    const DESCRIPTION: &'static str = S::DESCRIPTION;
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = GetAlertParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<GetAlertParams> {
        Ok(GetAlertParams {
            repo: RepoParams::extract(request)?,
            alert_number: required_int_param(request, "alert_number")?,
        })
    }

    async fn execute(client: &SharedClient, params: GetAlertParams) -> ToolResult<Value> {
        let path = format!("{}/{}", alerts_path(&params.repo, S::SEGMENT), params.alert_number);
        send(
            client.as_ref(),
            ApiRequest::get(path),
            format!("failed to get {} {}", S::NOUN, params.alert_number),
        )
        .await
    }
}

// ============================================================================
// Alert listings
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListCodeScanningAlertsParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// The Git reference for the results you want to list.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,

    /// Filter code scanning alerts by state. Defaults to open
    #[schemars(extend("enum" = ["open", "closed", "dismissed", "fixed"]))]
    pub state: Option<String>,

    /// Filter code scanning alerts by severity
    #[schemars(extend("enum" = ["critical", "high", "medium", "low", "warning", "note", "error"]))]
    pub severity: Option<String>,

    /// The name of the tool used for code scanning.
    pub tool_name: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListCodeScanningAlertsTool;

impl ToolDefinition for ListCodeScanningAlertsTool {
    const NAME: &'static str = "list_code_scanning_alerts";
    const TITLE: &'static str = "List code scanning alerts";
    const DESCRIPTION: &'static str = "List code scanning alerts in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListCodeScanningAlertsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListCodeScanningAlertsParams> {
        Ok(ListCodeScanningAlertsParams {
            repo: RepoParams::extract(request)?,
            git_ref: optional_param(request, "ref")?,
            state: optional_param(request, "state")?,
            severity: optional_param(request, "severity")?,
            tool_name: optional_param(request, "tool_name")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(
        client: &SharedClient,
        params: ListCodeScanningAlertsParams,
    ) -> ToolResult<Value> {
        let request = ApiRequest::get(alerts_path(&params.repo, CodeScanning::SEGMENT))
            .query_opt("ref", params.git_ref)
            .query_opt("state", params.state)
            .query_opt("severity", params.severity)
            .query_opt("tool_name", params.tool_name);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list code scanning alerts",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListSecretScanningAlertsParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Filter by state
    #[schemars(extend("enum" = ["open", "resolved"]))]
    pub state: Option<String>,

    /// A comma-separated list of secret types to return. All default secret patterns are returned.
    pub secret_type: Option<String>,

    /// Filter by resolution
    #[schemars(extend("enum" = ["false_positive", "wont_fix", "revoked", "pattern_edited", "pattern_deleted", "used_in_tests"]))]
    pub resolution: Option<String>,
}

pub struct ListSecretScanningAlertsTool;

impl ToolDefinition for ListSecretScanningAlertsTool {
    const NAME: &'static str = "list_secret_scanning_alerts";
    const TITLE: &'static str = "List secret scanning alerts";
    const DESCRIPTION: &'static str = "List secret scanning alerts in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListSecretScanningAlertsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListSecretScanningAlertsParams> {
        Ok(ListSecretScanningAlertsParams {
            repo: RepoParams::extract(request)?,
            state: optional_param(request, "state")?,
            secret_type: optional_param(request, "secret_type")?,
            resolution: optional_param(request, "resolution")?,
        })
    }

    async fn execute(
        client: &SharedClient,
        params: ListSecretScanningAlertsParams,
    ) -> ToolResult<Value> {
        let request = ApiRequest::get(alerts_path(&params.repo, SecretScanning::SEGMENT))
            .query_opt("state", params.state)
            .query_opt("secret_type", params.secret_type)
            .query_opt("resolution", params.resolution);
        send(client.as_ref(), request, "failed to list secret scanning alerts").await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListDependabotAlertsParams {
    #[serde(flatten)]
    pub repo: RepoParams,

    /// Filter dependabot alerts by state. Defaults to open
    #[schemars(extend("enum" = ["open", "fixed", "dismissed", "auto_dismissed"]))]
    pub state: Option<String>,

    /// Filter dependabot alerts by severity
    #[schemars(extend("enum" = ["low", "medium", "high", "critical"]))]
    pub severity: Option<String>,

    /// Filter dependabot alerts by package ecosystem
    pub ecosystem: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListDependabotAlertsTool;

impl ToolDefinition for ListDependabotAlertsTool {
    const NAME: &'static str = "list_dependabot_alerts";
    const TITLE: &'static str = "List dependabot alerts";
    const DESCRIPTION: &'static str = "List dependabot alerts in a GitHub repository.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListDependabotAlertsParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListDependabotAlertsParams> {
        Ok(ListDependabotAlertsParams {
            repo: RepoParams::extract(request)?,
            state: optional_param(request, "state")?,
            severity: optional_param(request, "severity")?,
            ecosystem: optional_param(request, "ecosystem")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(
        client: &SharedClient,
        params: ListDependabotAlertsParams,
    ) -> ToolResult<Value> {
        let request = ApiRequest::get(alerts_path(&params.repo, Dependabot::SEGMENT))
            .query_opt("state", params.state)
            .query_opt("severity", params.severity)
            .query_opt("ecosystem", params.ecosystem);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list dependabot alerts",
        )
        .await
    }
}

// ============================================================================
// Global advisories
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListGlobalSecurityAdvisoriesParams {
    /// Filter by GitHub Security Advisory ID (format: GHSA-xxxx-xxxx-xxxx).
    pub ghsa_id: Option<String>,

    /// Advisory type.
    #[serde(rename = "type")]
    #[schemars(extend("enum" = ["reviewed", "malware", "unreviewed"]))]
    pub advisory_type: Option<String>,

    /// Filter by CVE ID.
    pub cve_id: Option<String>,

    /// Filter by package ecosystem.
    pub ecosystem: Option<String>,

    /// Filter by severity.
    #[schemars(extend("enum" = ["unknown", "low", "medium", "high", "critical"]))]
    pub severity: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

pub struct ListGlobalSecurityAdvisoriesTool;

impl ToolDefinition for ListGlobalSecurityAdvisoriesTool {
    const NAME: &'static str = "list_global_security_advisories";
    const TITLE: &'static str = "List global security advisories";
    const DESCRIPTION: &'static str = "List global security advisories from GitHub.";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = ListGlobalSecurityAdvisoriesParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<ListGlobalSecurityAdvisoriesParams> {
        Ok(ListGlobalSecurityAdvisoriesParams {
            ghsa_id: optional_param(request, "ghsa_id")?,
            advisory_type: optional_param(request, "type")?,
            cve_id: optional_param(request, "cve_id")?,
            ecosystem: optional_param(request, "ecosystem")?,
            severity: optional_param(request, "severity")?,
            pagination: optional_pagination_params(request)?,
        })
    }

    async fn execute(
        client: &SharedClient,
        params: ListGlobalSecurityAdvisoriesParams,
    ) -> ToolResult<Value> {
        let request = ApiRequest::get("/advisories")
            .query_opt("ghsa_id", params.ghsa_id)
            .query_opt("type", params.advisory_type)
            .query_opt("cve_id", params.cve_id)
            .query_opt("ecosystem", params.ecosystem)
            .query_opt("severity", params.severity);
        send(
            client.as_ref(),
            params.pagination.apply(request),
            "failed to list global security advisories",
        )
        .await
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetGlobalSecurityAdvisoryParams {
    /// GitHub Security Advisory ID (format: GHSA-xxxx-xxxx-xxxx).
    pub ghsa_id: String,
}

pub struct GetGlobalSecurityAdvisoryTool;

impl ToolDefinition for GetGlobalSecurityAdvisoryTool {
    const NAME: &'static str = "get_global_security_advisory";
    const TITLE: &'static str = "Get a global security advisory";
    const DESCRIPTION: &'static str = "Get a global security advisory";
    const ACCESS: ToolAccess = ToolAccess::Read;

    type Params = GetGlobalSecurityAdvisoryParams;
    type Context = SharedClient;
    type Output = Value;

    fn extract(request: &ToolRequest) -> ParamResult<GetGlobalSecurityAdvisoryParams> {
        Ok(GetGlobalSecurityAdvisoryParams {
            ghsa_id: required_param(request, "ghsa_id")?,
        })
    }

    async fn execute(
        client: &SharedClient,
        params: GetGlobalSecurityAdvisoryParams,
    ) -> ToolResult<Value> {
        send(
            client.as_ref(),
            ApiRequest::get(format!("/advisories/{}", segment(&params.ghsa_id))),
            format!("failed to get advisory {}", params.ghsa_id),
        )
        .await
    }
}
