//! Tools domain module.
//!
//! Everything the server exposes as an MCP tool lives here.
//!
//! ## Architecture
//!
//! - `params.rs` / `pagination.rs` - typed extraction of tool arguments
//! - `result.rs` - JSON text results
//! - `handlers.rs` - `ToolDescriptor`, `ToolHandler` and the `ToolDefinition` trait
//! - `toolset.rs` / `registry.rs` - toolsets and the registry that gates them
//! - `dynamic.rs` - the `dynamic` toolset for enabling toolsets at runtime
//! - `definitions/` - the GitHub tools, one file per toolset
//! - `catalog.rs` - the default toolset list and registry construction
//!
//! ## Adding a New Tool
//!
//! 1. Add a params struct and a unit struct implementing `ToolDefinition`
//!    in the toolset's file under `definitions/`
//! 2. Register it in that file's `toolset()` constructor
//!
//! The server picks it up from the registry; nothing else changes.

pub mod catalog;
pub mod definitions;
pub mod dynamic;
mod error;
mod handlers;
pub mod pagination;
pub mod params;
pub mod registry;
pub mod result;
pub mod toolset;

pub use catalog::{build_registry, default_toolsets};
pub use error::{ToolError, ToolResult};
pub use handlers::*;
pub use params::{ParamError, ToolRequest};
pub use registry::{RegistryError, ToolsetGroup};
pub use toolset::Toolset;
