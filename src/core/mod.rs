//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! error handling, configuration, the GitHub API client, the server handler
//! and the transport layer.

pub mod config;
pub mod error;
pub mod github;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::GithubMcpServer;
pub use transport::{TransportConfig, TransportService};
