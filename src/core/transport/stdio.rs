//! STDIO transport: rmcp serving `GithubMcpServer` over stdin/stdout.
//!
//! stdout carries only protocol messages, so all logging goes to stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::GithubMcpServer;

pub struct StdioTransport;

impl StdioTransport {
    /// Serve one client session until stdin closes.
    pub async fn run(server: GithubMcpServer) -> TransportResult<()> {
        info!(
            tools = server.tools().len(),
            "Ready - communicating via stdin/stdout"
        );

        let session = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(TransportError::handshake)?;

        let reason = session.waiting().await.map_err(TransportError::session)?;

        info!(?reason, "STDIO session ended");
        Ok(())
    }
}
