//! Unreal Editor MCP server entry point.
//!
//! Logs go to stderr; on the STDIO transport stdout belongs to the protocol.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use unreal_editor_mcp::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    init_logging(&config.logging.level);
    config.validate()?;

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        "Unreal Editor API at {} (timeout {}s)",
        config.unreal.base_url, config.unreal.timeout_secs
    );

    let server = McpServer::new(config.clone());
    server.startup_check().await;

    let transport = TransportService::new(config.transport);
    let outcome = transport.run(server.clone()).await;

    server.shutdown();
    outcome?;

    info!("Server stopped");
    Ok(())
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` directives are honored; `level` sets the baseline.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
