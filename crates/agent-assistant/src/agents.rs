//! The assistant's agent graph
//!
//! ```text
//! RootAgent
//! ├── SearchAgent   (google_search)
//! ├── CodeAgent     (code_execution)
//! ├── MapsAgent     (Google Maps MCP server)
//! └── get_weather   (OpenWeather)
//! ```

use agent_core::Result;
use agent_llm::BuiltinTool;
use agent_mcp::{MCPConfig, MCPServerConfig, MCPToolset};
use agent_runtime::AgentDescriptor;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::AssistantConfig;
use crate::weather::{WeatherClient, WeatherTool};

/// Name of the maps MCP toolset
pub const MAPS_TOOLSET: &str = "google-maps";

/// npm package of the Google Maps MCP server
pub const MAPS_SERVER_PACKAGE: &str = "@modelcontextprotocol/server-google-maps";

/// `SearchAgent`: answers through Google Search
pub fn search_agent(config: &AssistantConfig) -> Result<Arc<AgentDescriptor>> {
    let agent = AgentDescriptor::builder("SearchAgent")
        .description("An agent that retrieves users' queries through Google Search.")
        .model(&config.root_model)
        .instruction("You're a specialist in Google Search")
        .builtin_tool(BuiltinTool::GoogleSearch)
        .build()?;
    Ok(Arc::new(agent))
}

/// `CodeAgent`: answers by running code
pub fn code_agent(config: &AssistantConfig) -> Result<Arc<AgentDescriptor>> {
    let agent = AgentDescriptor::builder("CodeAgent")
        .description("An agent that solves users' queries by calculating them through code.")
        .model(&config.specialist_model)
        .instruction("You're a specialist in Code Execution")
        .builtin_tool(BuiltinTool::CodeExecution)
        .build()?;
    Ok(Arc::new(agent))
}

/// The Google Maps MCP server, launched through `npx`
///
/// The maps key reaches the server only through its environment.
pub fn maps_toolset(config: &AssistantConfig) -> MCPToolset {
    MCPToolset::new(
        MAPS_TOOLSET,
        MCPServerConfig::stdio(
            "npx",
            ["-y", MAPS_SERVER_PACKAGE],
            HashMap::from([(
                "GOOGLE_MAPS_API_KEY".to_string(),
                config.google_maps_api_key.clone(),
            )]),
        ),
    )
}

/// Extra `MapsAgent` toolsets from an MCP config file
///
/// Environment references in the file are expanded from the process
/// environment.
pub fn maps_toolsets_from_file(path: &Path) -> Result<Vec<MCPToolset>> {
    maps_toolsets_from_file_with(path, |name| std::env::var(name).ok())
}

/// Like [`maps_toolsets_from_file`], reading variables through `lookup`
pub fn maps_toolsets_from_file_with<F>(path: &Path, lookup: F) -> Result<Vec<MCPToolset>>
where
    F: Fn(&str) -> Option<String>,
{
    let config = MCPConfig::from_file_with(path, lookup)?;
    Ok(MCPToolset::from_config(&config, "MapsAgent")?)
}

/// `MapsAgent`: mapping and directions through the maps toolset
///
/// `extra_toolsets` are added after the Google Maps one.
pub fn maps_agent(
    config: &AssistantConfig,
    extra_toolsets: Vec<MCPToolset>,
) -> Result<Arc<AgentDescriptor>> {
    let mut builder = AgentDescriptor::builder("MapsAgent")
        .description("An agent that helps with maps, directions and places through Google Maps.")
        .model(&config.specialist_model)
        .instruction(
            "Help the user with mapping, directions, and finding places using Google Maps tools.",
        )
        .mcp_toolset(maps_toolset(config));
    for toolset in extra_toolsets {
        builder = builder.mcp_toolset(toolset);
    }
    Ok(Arc::new(builder.build()?))
}

/// `RootAgent`: delegates to the specialists and calls `get_weather`
pub fn root_agent(
    config: &AssistantConfig,
    weather: WeatherClient,
    extra_maps_toolsets: Vec<MCPToolset>,
) -> Result<AgentDescriptor> {
    let root = AgentDescriptor::builder("RootAgent")
        .description("Root Agent")
        .model(&config.root_model)
        .sub_agent(search_agent(config)?)
        .sub_agent(code_agent(config)?)
        .sub_agent(maps_agent(config, extra_maps_toolsets)?)
        .function_tool(Arc::new(WeatherTool::new(weather)))
        .build()?;
    root.validate_tree()?;
    Ok(root)
}
