//! Multi-agent assistant
//!
//! A root agent that delegates to three specialists and calls one function:
//!
//! - `SearchAgent` answers through the Google Search built-in
//! - `CodeAgent` answers through the code-execution built-in
//! - `MapsAgent` uses the tools of the Google Maps MCP server
//! - `get_weather` queries OpenWeather
//!
//! [`agents::root_agent`] returns the descriptor graph;
//! [`agent_runtime::AgentRuntime::build_agent`] turns it into running agents.

pub mod agents;
pub mod config;
pub mod error;
pub mod weather;

pub use agents::{
    code_agent, maps_agent, maps_toolset, maps_toolsets_from_file, maps_toolsets_from_file_with,
    root_agent, search_agent,
};
pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
pub use weather::{WeatherClient, WeatherTool};
