//! Domains module containing business logic organized by bounded contexts.
//!
//! The only context is `tools`: the GitHub tool catalog and the registry
//! that decides which of its tools clients can see.

pub mod tools;
