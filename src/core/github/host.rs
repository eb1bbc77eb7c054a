//! GitHub API host resolution.
//!
//! Maps the configured host (`github.com`, a GHE.com tenant, or a GitHub
//! Enterprise Server hostname) to its REST and GraphQL endpoints.

use super::error::{ApiError, ApiResult};

const DOTCOM_HOST: &str = "github.com";
const GHEC_SUFFIX: &str = ".ghe.com";

/// Resolved API endpoints for one GitHub installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiHost {
    /// REST base URL, always ending with `/`.
    pub rest_url: String,
    /// GraphQL endpoint URL.
    pub graphql_url: String,
}

impl ApiHost {
    /// Resolve endpoints for `host`. An empty host means github.com.
    pub fn parse(host: &str) -> ApiResult<Self> {
        let host = host.trim();
        if host.is_empty() || host == DOTCOM_HOST || host == "https://github.com" {
            return Ok(Self::dotcom());
        }

        let (scheme, hostname) = if let Some(rest) = host.strip_prefix("http://") {
            ("http", rest)
        } else if let Some(rest) = host.strip_prefix("https://") {
            ("https", rest)
        } else {
            ("https", host)
        };
        let hostname = hostname.trim_end_matches('/');

        if hostname.is_empty() || hostname.contains('/') || hostname.contains(' ') {
            return Err(ApiError::InvalidHost(host.to_string()));
        }

        if hostname.ends_with(GHEC_SUFFIX) {
            return Ok(Self {
                rest_url: format!("{scheme}://api.{hostname}/"),
                graphql_url: format!("{scheme}://api.{hostname}/graphql"),
            });
        }

        Ok(Self {
            rest_url: format!("{scheme}://{hostname}/api/v3/"),
            graphql_url: format!("{scheme}://{hostname}/api/graphql"),
        })
    }

    /// Endpoints for github.com.
    pub fn dotcom() -> Self {
        Self {
            rest_url: "https://api.github.com/".to_string(),
            graphql_url: "https://api.github.com/graphql".to_string(),
        }
    }

    /// Join a REST path (with or without a leading slash) onto the base URL.
    pub fn rest_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.rest_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotcom() {
        assert_eq!(ApiHost::parse("").unwrap(), ApiHost::dotcom());
        assert_eq!(ApiHost::parse("github.com").unwrap(), ApiHost::dotcom());
    }

    #[test]
    fn test_enterprise_server() {
        let host = ApiHost::parse("github.example.com").unwrap();
        assert_eq!(host.rest_url, "https://github.example.com/api/v3/");
        assert_eq!(host.graphql_url, "https://github.example.com/api/graphql");

        let host = ApiHost::parse("http://ghes.local/").unwrap();
        assert_eq!(host.rest_url, "http://ghes.local/api/v3/");
    }

    #[test]
    fn test_ghe_com_tenant() {
        let host = ApiHost::parse("https://acme.ghe.com").unwrap();
        assert_eq!(host.rest_url, "https://api.acme.ghe.com/");
        assert_eq!(host.graphql_url, "https://api.acme.ghe.com/graphql");
    }

    #[test]
    fn test_invalid_host() {
        assert!(ApiHost::parse("https://").is_err());
        assert!(ApiHost::parse("example.com/path").is_err());
    }

    #[test]
    fn test_rest_endpoint() {
        let host = ApiHost::dotcom();
        assert_eq!(
            host.rest_endpoint("/repos/o/r"),
            "https://api.github.com/repos/o/r"
        );
        assert_eq!(host.rest_endpoint("user"), "https://api.github.com/user");
    }
}
