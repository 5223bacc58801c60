//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the editor connection, the server
//! lifecycle and the transports.

pub mod config;
pub mod connection;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use connection::UnrealConnection;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
