//! Transports that carry MCP messages to and from the GitHub server.
//!
//! - `stdio` (default feature): rmcp over stdin/stdout. Tool list changes
//!   are pushed to the client as `notifications/tools/list_changed`.
//! - `http`: JSON-RPC over `POST /mcp`. Clients re-query `tools/list`
//!   after calling `enable_toolset`.
//!
//! `TransportService` picks one from `TransportConfig` and runs it until the
//! session or server ends.

mod config;
mod error;
mod service;

#[cfg(feature = "stdio")]
pub mod stdio;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use config::HttpConfig;
pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
