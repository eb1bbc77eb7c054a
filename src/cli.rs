//! Command-line flags.
//!
//! Flags override whatever the environment (and `.env`) configured.

use clap::Parser;

use crate::core::Config;
use crate::core::config::parse_toolsets;

/// GitHub MCP server.
#[derive(Debug, Parser)]
#[command(name = "github-mcp-server", version)]
#[command(about = "Expose the GitHub API to MCP clients as toolsets", long_about = None)]
pub struct Cli {
    /// GitHub personal access token
    #[arg(long)]
    pub token: Option<String>,

    /// GitHub host (github.com, a *.ghe.com tenant or an Enterprise Server URL)
    #[arg(long = "gh-host")]
    pub gh_host: Option<String>,

    /// Hide every tool that modifies GitHub
    #[arg(long)]
    pub read_only: bool,

    /// Comma-separated toolsets to enable, or "all"
    #[arg(long)]
    pub toolsets: Option<String>,

    /// Let clients enable toolsets at runtime
    #[arg(long)]
    pub dynamic_toolsets: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Apply the flags that were given on top of `config`.
    ///
    /// Boolean flags can only switch a setting on.
    pub fn apply(self, config: &mut Config) {
        if let Some(token) = self.token {
            config.github.token = Some(token);
        }
        if let Some(host) = self.gh_host {
            config.github.host = host;
        }
        if self.read_only {
            config.github.read_only = true;
        }
        if let Some(toolsets) = self.toolsets.as_deref().and_then(parse_toolsets) {
            config.github.toolsets = Some(toolsets);
        }
        if self.dynamic_toolsets {
            config.github.dynamic_toolsets = true;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "github-mcp-server",
            "--token",
            "ghp_x",
            "--gh-host",
            "octo.ghe.com",
            "--read-only",
            "--toolsets",
            "repos, issues",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.github.token.as_deref(), Some("ghp_x"));
        assert_eq!(config.github.host, "octo.ghe.com");
        assert!(config.github.read_only);
        assert!(!config.github.dynamic_toolsets);
        assert_eq!(
            config.github.toolsets,
            Some(vec!["repos".to_string(), "issues".to_string()])
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["github-mcp-server"]).unwrap();

        let mut config = Config::default();
        config.github.read_only = true;
        config.github.toolsets = Some(vec!["gists".to_string()]);
        cli.apply(&mut config);

        assert!(config.github.read_only);
        assert_eq!(config.github.toolsets, Some(vec!["gists".to_string()]));
        assert_eq!(config.github.host, "github.com");
    }

    #[test]
    fn test_blank_toolsets_flag_is_ignored() {
        let cli = Cli::try_parse_from(["github-mcp-server", "--toolsets", ""]).unwrap();

        let mut config = Config::default();
        cli.apply(&mut config);
        assert!(config.github.toolsets.is_none());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["github-mcp-server", "--write-everything"]).is_err());
    }
}
