//! GitHub tool definitions.
//!
//! One file per toolset. Each exposes a `toolset(&SharedClient)` constructor
//! (or several, where a file covers more than one toolset) plus the
//! individual tool structs.

pub mod actions;
pub mod common;
pub mod context;
pub mod discussions;
pub mod gists;
pub mod issues;
pub mod notifications;
pub mod pull_requests;
pub mod repos;
pub mod security;
pub mod users;
