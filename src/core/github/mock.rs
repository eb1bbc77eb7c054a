//! Recording GitHub collaborator for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiError, ApiRequest, ApiResult, GitHubApi};

/// Returns a canned response (or failure) and records every call.
#[derive(Debug, Default)]
pub struct MockGitHub {
    response: Value,
    failure: Option<(u16, String)>,
    requests: Mutex<Vec<ApiRequest>>,
    queries: Mutex<Vec<(String, Value)>>,
}

impl MockGitHub {
    pub fn returning(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response,
            ..Default::default()
        })
    }

    pub fn failing(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Some((status, message.to_string())),
            ..Default::default()
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests().pop().expect("no request recorded")
    }

    pub fn graphql_calls(&self) -> Vec<(String, Value)> {
        self.queries.lock().unwrap().clone()
    }

    fn reply(&self, method: &str, path: &str) -> ApiResult<Value> {
        match &self.failure {
            Some((status, message)) => Err(ApiError::status(method, path, *status, message.clone())),
            None => Ok(self.response.clone()),
        }
    }
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let method = request.method().to_string();
        let path = request.path().to_string();
        self.requests.lock().unwrap().push(request);
        self.reply(&method, &path)
    }

    async fn graphql(&self, query: &str, variables: Value) -> ApiResult<Value> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), variables));
        self.reply("POST", "graphql")
    }
}
