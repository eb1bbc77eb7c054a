//! Tool-specific error types.

use thiserror::Error;

use super::params::ParamError;
use crate::core::github::ApiError;

/// Result type for tool execution.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur while executing a tool.
///
/// Every variant is reported to the client as an error result, never as a
/// protocol error.
#[derive(Debug, Error)]
pub enum ToolError {
    /// An argument failed the parameter contract.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// The GitHub API call failed.
    #[error("{context}: {source}")]
    Api {
        context: String,
        #[source]
        source: ApiError,
    },

    /// The requested object does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The API answered with something the tool could not interpret.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Wrap an API failure with a short description of what was attempted.
    pub fn api(context: impl Into<String>, source: ApiError) -> Self {
        Self::Api {
            context: context.into(),
            source,
        }
    }

    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<ApiError> for ToolError {
    fn from(source: ApiError) -> Self {
        Self::api("GitHub API request failed", source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_error_is_transparent() {
        let err: ToolError = ParamError::Missing {
            name: "owner".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "missing required parameter: owner");
    }

    #[test]
    fn test_api_error_keeps_message() {
        let err = ToolError::api(
            "failed to get issue",
            ApiError::status("GET", "/repos/o/r/issues/1", 404, "Not Found"),
        );
        assert_eq!(
            err.to_string(),
            "failed to get issue: GET /repos/o/r/issues/1 returned 404: Not Found"
        );
    }
}
