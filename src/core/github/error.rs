//! GitHub API error types.

use thiserror::Error;

/// Result type for GitHub API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors reported by the GitHub API collaborator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status.
    #[error("{method} {path} returned {status}: {message}")]
    Status {
        method: String,
        path: String,
        status: u16,
        message: String,
    },

    /// The GraphQL endpoint reported errors.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The client was configured with an unusable host.
    #[error("invalid GitHub host: {0}")]
    InvalidHost(String),
}

impl ApiError {
    /// Create a status error.
    pub fn status(
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Status {
            method: method.into(),
            path: path.into(),
            status,
            message: message.into(),
        }
    }

    /// HTTP status code, if GitHub produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
