//! Configuration management for the MCP server.
//!
//! Values come from environment variables (after loading `.env` with
//! dotenvy). Command-line flags are applied on top by the binary.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// GitHub connection and toolset selection.
    pub github: GitHubConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// GitHub access and the toolsets to expose.
#[derive(Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Personal access token used for every API call.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// GitHub host: `github.com`, a `*.ghe.com` tenant or an Enterprise Server URL.
    pub host: String,

    /// Hide every write tool.
    pub read_only: bool,

    /// Toolsets to enable. `None` keeps the catalog defaults.
    pub toolsets: Option<Vec<String>>,

    /// Expose the `dynamic` toolset so clients can enable toolsets at runtime.
    pub dynamic_toolsets: bool,
}

/// Custom Debug implementation to redact the token from logs.
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("read_only", &self.read_only)
            .field("toolsets", &self.toolsets)
            .field("dynamic_toolsets", &self.dynamic_toolsets)
            .finish()
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            host: "github.com".to_string(),
            read_only: false,
            toolsets: None,
            dynamic_toolsets: false,
        }
    }
}

impl GitHubConfig {
    /// The configured token, or a configuration error when none is set.
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::config("GITHUB_PERSONAL_ACCESS_TOKEN not set"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "github-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            github: GitHubConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

/// Interpret an environment flag. `1`, `true`, `yes` and `on` are true.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Split a comma-separated toolset list, dropping blanks.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a configured toolset selection. A blank list keeps the catalog
/// defaults, so it maps to `None`.
pub fn parse_toolsets(value: &str) -> Option<Vec<String>> {
    Some(parse_list(value)).filter(|names| !names.is_empty())
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(name) = lookup("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = lookup("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_lookup(&lookup);

        match lookup("GITHUB_PERSONAL_ACCESS_TOKEN") {
            Some(token) if !token.trim().is_empty() => {
                config.github.token = Some(token);
                info!("GitHub token loaded from environment");
            }
            _ => warn!("GITHUB_PERSONAL_ACCESS_TOKEN not set; pass --token to start the server"),
        }

        if let Some(host) = lookup("GITHUB_HOST").filter(|h| !h.trim().is_empty()) {
            config.github.host = host;
        }

        if let Some(read_only) = lookup("GITHUB_READ_ONLY") {
            config.github.read_only = parse_bool(&read_only);
        }

        if let Some(toolsets) = lookup("GITHUB_TOOLSETS") {
            config.github.toolsets = parse_toolsets(&toolsets);
        }

        if let Some(dynamic) = lookup("GITHUB_DYNAMIC_TOOLSETS") {
            config.github.dynamic_toolsets = parse_bool(&dynamic);
        }

        config
    }
}
