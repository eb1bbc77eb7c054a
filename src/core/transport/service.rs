//! Runs whichever transport the configuration selected.

use tracing::info;

use super::{TransportConfig, TransportResult};
use crate::core::GithubMcpServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Select the transport from `MCP_TRANSPORT` and friends.
    pub fn from_env() -> Self {
        Self::new(TransportConfig::from_env())
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Serve `server` until the transport shuts down.
    pub async fn run(self, server: GithubMcpServer) -> TransportResult<()> {
        info!(
            server = server.name(),
            read_only = server.config().github.read_only,
            "Starting transport: {}",
            self.config.description()
        );

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server).await,
            #[cfg(feature = "http")]
            TransportConfig::Http(http) => HttpTransport::new(http).run(server).await,
        }
    }
}
