//! Errors raised while starting or running a transport.

use thiserror::Error;

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP listener could not bind its address.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The MCP initialize handshake with the client failed.
    #[error("MCP handshake failed: {0}")]
    Handshake(String),

    /// An established MCP session ended with an error.
    #[error("MCP session failed: {0}")]
    Session(String),

    /// The HTTP server stopped with an error.
    #[error("HTTP server error: {0}")]
    Http(String),
}

impl TransportError {
    #[cfg(feature = "http")]
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    pub fn handshake(err: impl std::fmt::Display) -> Self {
        Self::Handshake(err.to_string())
    }

    pub fn session(err: impl std::fmt::Display) -> Self {
        Self::Session(err.to_string())
    }

    #[cfg(feature = "http")]
    pub fn http(err: impl std::fmt::Display) -> Self {
        Self::Http(err.to_string())
    }
}
