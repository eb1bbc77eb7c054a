//! Pagination settings derived from tool arguments.
//!
//! Bounds (`page >= 1`, `perPage` between 1 and 100) are declared in the
//! generated input schema for the client's benefit. The resolvers below only
//! apply defaults; they do not reject out-of-range values.

use schemars::JsonSchema;
use serde::Serialize;

use super::params::{ParamResult, ToolRequest, optional_int_param_with_default, optional_param};
use crate::core::github::ApiRequest;

/// Default page number.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size.
pub const DEFAULT_PER_PAGE: i64 = 30;

/// Offset-style pagination for REST list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(default)]
pub struct PaginationParams {
    /// Page number for pagination (min 1)
    #[schemars(range(min = 1))]
    pub page: i64,

    /// Results per page for pagination (min 1, max 100)
    #[serde(rename = "perPage")]
    #[schemars(range(min = 1, max = 100))]
    pub per_page: i64,

    /// Cursor for pagination. Use the endCursor from a previous page.
    pub after: String,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            after: String::new(),
        }
    }
}

impl PaginationParams {
    /// Add `page` and `per_page` query parameters to a REST request.
    pub fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query("page", self.page)
            .query("per_page", self.per_page)
    }
}

/// Cursor-style pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(default)]
pub struct CursorPaginationParams {
    /// Results per page for pagination (min 1, max 100)
    #[serde(rename = "perPage")]
    #[schemars(range(min = 1, max = 100))]
    pub per_page: i64,

    /// Cursor for pagination. Use the endCursor from a previous page.
    pub after: String,
}

impl Default for CursorPaginationParams {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            after: String::new(),
        }
    }
}

impl CursorPaginationParams {
    /// Convert to GraphQL `first`/`after` arguments.
    pub fn to_graphql(&self) -> GraphQLPaginationParams {
        GraphQLPaginationParams {
            first: Some(self.per_page),
            after: (!self.after.is_empty()).then(|| self.after.clone()),
        }
    }
}

/// GraphQL connection arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphQLPaginationParams {
    pub first: Option<i64>,
    pub after: Option<String>,
}

/// Resolve offset pagination, defaulting to page 1 with 30 results.
pub fn optional_pagination_params(request: &ToolRequest) -> ParamResult<PaginationParams> {
    Ok(PaginationParams {
        page: optional_int_param_with_default(request, "page", DEFAULT_PAGE)?,
        per_page: optional_int_param_with_default(request, "perPage", DEFAULT_PER_PAGE)?,
        after: optional_param::<String>(request, "after")?.unwrap_or_default(),
    })
}

/// Resolve cursor pagination, defaulting to 30 results from the start.
pub fn optional_cursor_pagination_params(request: &ToolRequest) -> ParamResult<CursorPaginationParams> {
    Ok(CursorPaginationParams {
        per_page: optional_int_param_with_default(request, "perPage", DEFAULT_PER_PAGE)?,
        after: optional_param::<String>(request, "after")?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::params::ParamError;
    use serde_json::json;

    fn request(arguments: serde_json::Value) -> ToolRequest {
        ToolRequest::from_value("list_commits", arguments)
    }

    #[test]
    fn test_pagination_defaults() {
        let params = optional_pagination_params(&request(json!({}))).unwrap();
        assert_eq!(
            params,
            PaginationParams {
                page: 1,
                per_page: 30,
                after: String::new(),
            }
        );
    }

    #[test]
    fn test_pagination_explicit_values() {
        let params =
            optional_pagination_params(&request(json!({ "page": 3, "perPage": 100, "after": "abc" })))
                .unwrap();
        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, 100);
        assert_eq!(params.after, "abc");
    }

    #[test]
    fn test_pagination_out_of_range_is_not_rejected() {
        let params = optional_pagination_params(&request(json!({ "page": 0, "perPage": 500 }))).unwrap();
        assert_eq!(params.page, 0);
        assert_eq!(params.per_page, 500);
    }

    #[test]
    fn test_pagination_type_mismatch() {
        let err = optional_pagination_params(&request(json!({ "after": 12 }))).unwrap_err();
        assert!(matches!(err, ParamError::TypeMismatch { .. }));
        assert_eq!(err.parameter(), "after");
    }

    #[test]
    fn test_cursor_pagination_and_graphql() {
        let cursor = optional_cursor_pagination_params(&request(json!({}))).unwrap();
        assert_eq!(cursor, CursorPaginationParams::default());
        assert_eq!(
            cursor.to_graphql(),
            GraphQLPaginationParams {
                first: Some(30),
                after: None,
            }
        );

        let cursor =
            optional_cursor_pagination_params(&request(json!({ "perPage": 10, "after": "Y3Vy" })))
                .unwrap();
        let graphql = cursor.to_graphql();
        assert_eq!(graphql.first, Some(10));
        assert_eq!(graphql.after.as_deref(), Some("Y3Vy"));
    }

    #[test]
    fn test_apply_adds_query() {
        let params = PaginationParams {
            page: 2,
            per_page: 50,
            after: String::new(),
        };
        let api = params.apply(ApiRequest::get("/repos/o/r/commits"));
        assert_eq!(
            api.query_pairs(),
            &[
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "50".to_string())
            ]
        );
    }

    #[test]
    fn test_schema_declares_bounds() {
        let schema = serde_json::to_value(schemars::schema_for!(PaginationParams)).unwrap();
        let per_page = &schema["properties"]["perPage"];
        assert_eq!(per_page["minimum"], 1);
        assert_eq!(per_page["maximum"], 100);
        assert_eq!(schema["properties"]["page"]["minimum"], 1);
    }
}
