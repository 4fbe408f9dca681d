//! Tool management and execution framework
//!
//! Tools are the callable capabilities an agent exposes to its model:
//! plain functions, other agents, or tools discovered on an MCP server.
//! All of them implement [`Tool`] and are collected per agent in a
//! [`ToolRegistry`].

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
