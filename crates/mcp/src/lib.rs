//! MCP (Model Context Protocol) server for Xcode Cloud.
//!
//! Exposes App Store Connect's Xcode Cloud API as tools that agent clients
//! can call: listing products and workflows, starting and monitoring builds,
//! and managing workflow configuration.

pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
pub mod uri;

pub use server::McpServer;
pub use tools::build_registry;
