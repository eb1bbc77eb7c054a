//! GitHub MCP Server Entry Point
//!
//! Loads configuration from the environment, applies command-line flags,
//! initializes logging and starts the server on the configured transport.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use github_mcp_server::cli::Cli;
use github_mcp_server::core::{Config, GithubMcpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment first, flags on top
    let mut config = Config::from_env();
    cli.apply(&mut config);

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        host = %config.github.host,
        read_only = config.github.read_only,
        dynamic_toolsets = config.github.dynamic_toolsets,
        "GitHub settings"
    );

    let transport = TransportService::new(config.transport.clone());
    let server = GithubMcpServer::new(config).context("failed to initialize server")?;

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
