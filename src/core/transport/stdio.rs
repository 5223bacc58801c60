//! STDIO transport implementation.
//!
//! stdout carries protocol frames only; logs go to stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve `server` on stdin/stdout until the host closes the stream.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!(
            "Ready - {} tools available via stdin/stdout",
            server.registry().count()
        );

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::service(e.to_string()))?;

        info!("STDIO transport finished");
        Ok(())
    }
}
