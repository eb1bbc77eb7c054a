//! GitHub API collaborator.
//!
//! - `client.rs` - the [`GitHubApi`] trait, request description and the
//!   reqwest-backed [`RestClient`]
//! - `host.rs` - REST and GraphQL endpoint resolution
//! - `error.rs` - API error types

mod client;
mod error;
mod host;

#[cfg(test)]
pub mod mock;

pub use client::{ApiRequest, GitHubApi, RestClient, SharedClient};
pub use error::{ApiError, ApiResult};
pub use host::ApiHost;
