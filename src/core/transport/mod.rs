//! Transport layer for the MCP server.
//!
//! - **STDIO**: rmcp over stdin/stdout, the mode MCP hosts launch - feature: `stdio`
//! - **HTTP**: JSON-RPC over POST plus a `/health` check - feature: `http`
//!
//! Both transports dispatch through the server's tool registry.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
