//! Model Context Protocol (MCP) integration
//!
//! Launches MCP servers as child processes, speaks JSON-RPC to them over
//! stdio and exposes the tools they list as [`agent_tools::Tool`]s.
//!
//! # Example
//!
//! ```no_run
//! use agent_mcp::{MCPServerConfig, MCPToolset};
//! use std::collections::HashMap;
//!
//! # async fn example() -> agent_mcp::Result<()> {
//! let toolset = MCPToolset::new(
//!     "google-maps",
//!     MCPServerConfig::stdio(
//!         "npx",
//!         ["-y", "@modelcontextprotocol/server-google-maps"],
//!         HashMap::from([("GOOGLE_MAPS_API_KEY".to_string(), "...".to_string())]),
//!     ),
//! );
//!
//! let (manager, tools) = toolset.load_tools("MapsAgent").await?;
//! println!("Discovered {} tools", tools.len());
//! manager.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod tool;
pub mod toolset;

pub use client::manager::MCPClientManager;
pub use config::{AgentMCPConfig, MCPConfig, MCPServerConfig, ToolFilter, ToolPattern};
pub use error::MCPError;
pub use tool::MCPTool;
pub use toolset::MCPToolset;

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, MCPError>;
