//! GitHub MCP Server Library
//!
//! This crate exposes the GitHub API to Model Context Protocol clients as a
//! catalog of tools grouped into toolsets.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Configuration, error handling, the GitHub API client, the server handler and transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: Parameter extraction, result encoding, toolsets, the registry and the tool catalog
//! - **cli**: Command-line flags layered over the environment configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use github_mcp_server::{Config, GithubMcpServer, core::TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = GithubMcpServer::new(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, GithubMcpServer, Result};
