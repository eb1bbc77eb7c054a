//! GitHub API client.
//!
//! Tool handlers talk to GitHub through the [`GitHubApi`] trait. Each call
//! describes one REST request ([`ApiRequest`]) or one GraphQL query, and the
//! raw JSON response is handed back unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::ACCEPT;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::error::{ApiError, ApiResult};
use super::host::ApiHost;

/// REST API version requested on every call.
const API_VERSION: &str = "2022-11-28";

/// Media type for JSON responses.
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Shared handle to the API collaborator.
pub type SharedClient = Arc<dyn GitHubApi>;

// ============================================================================
// Request description
// ============================================================================

/// One REST call: method, path relative to the API root, query and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when a value is present.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

// ============================================================================
// Collaborator trait
// ============================================================================

/// The external GitHub API collaborator used by tool handlers.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Send a REST request and return the decoded JSON body (null when empty).
    async fn send(&self, request: ApiRequest) -> ApiResult<Value>;

    /// Run a GraphQL query and return its `data` member.
    async fn graphql(&self, query: &str, variables: Value) -> ApiResult<Value>;
}

// ============================================================================
// reqwest implementation
// ============================================================================

/// GitHub client backed by reqwest.
pub struct RestClient {
    http: reqwest::Client,
    host: ApiHost,
    token: String,
}

impl RestClient {
    /// Create a client for `host` authenticating with `token`.
    pub fn new(token: impl Into<String>, host: &str) -> ApiResult<Self> {
        let host = ApiHost::parse(host)?;
        let http = reqwest::Client::builder()
            .user_agent(format!("github-mcp-server/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            host,
            token: token.into(),
        })
    }

    /// The resolved endpoints.
    pub fn host(&self) -> &ApiHost {
        &self.host
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_JSON)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn read_json(method: &Method, path: &str, response: reqwest::Response) -> ApiResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(ApiError::status(method.as_str(), path, status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("host", &self.host)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl GitHubApi for RestClient {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        debug!("Sending GitHub REST request");
        let url = self.host.rest_endpoint(&request.path);

        let mut builder = self.authorized(self.http.request(request.method.clone(), url));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        Self::read_json(&request.method, &request.path, response).await
    }

    #[instrument(skip_all)]
    async fn graphql(&self, query: &str, variables: Value) -> ApiResult<Value> {
        debug!("Sending GitHub GraphQL query");
        let builder = self
            .authorized(self.http.post(&self.host.graphql_url))
            .json(&json!({ "query": query, "variables": variables }));

        let response = builder.send().await?;
        let body = Self::read_json(&Method::POST, "graphql", response).await?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array)
            && !errors.is_empty()
        {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect();
            return Err(ApiError::GraphQl(messages.join("; ")));
        }

        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::post("/repos/o/r/issues")
            .query("page", 2)
            .query_opt("sort", Some("created"))
            .query_opt::<&str>("state", None)
            .json(json!({ "title": "t" }));

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/repos/o/r/issues");
        assert_eq!(
            request.query_pairs(),
            &[
                ("page".to_string(), "2".to_string()),
                ("sort".to_string(), "created".to_string())
            ]
        );
        assert_eq!(request.body(), Some(&json!({ "title": "t" })));
    }

    #[test]
    fn test_rest_client_resolves_host() {
        let client = RestClient::new("token", "github.example.com").unwrap();
        assert_eq!(client.host().rest_url, "https://github.example.com/api/v3/");
        assert!(RestClient::new("token", "bad host/x").is_err());
    }

    #[test]
    fn test_rest_client_debug_redacts_token() {
        let client = RestClient::new("ghp_secret", "github.com").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("ghp_secret"));
    }
}
