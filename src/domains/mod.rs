//! Domains module containing business logic organized by bounded contexts.
//!
//! The only context so far is `tools`: the editor operations exposed to
//! MCP clients.

pub mod tools;
