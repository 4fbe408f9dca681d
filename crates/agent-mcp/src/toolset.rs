//! A set of tools served by one MCP server
//!
//! An [`MCPToolset`] is the declarative form: how to launch the server and
//! which of its tools to expose. Nothing runs until [`MCPToolset::load_tools`]
//! starts the process.

use agent_tools::Tool;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::Result;
use crate::client::manager::MCPClientManager;
use crate::config::{AgentMCPConfig, MCPConfig, MCPServerConfig, ToolFilter};
use crate::discovery::discover_tools;
use crate::error::MCPError;

/// Connection parameters plus an optional tool filter for one MCP server
#[derive(Debug, Clone, PartialEq)]
pub struct MCPToolset {
    name: String,
    connection: MCPServerConfig,
    tool_filter: ToolFilter,
}

impl MCPToolset {
    /// Toolset exposing every tool of the server
    pub fn new(name: impl Into<String>, connection: MCPServerConfig) -> Self {
        Self {
            name: name.into(),
            connection,
            tool_filter: ToolFilter::default(),
        }
    }

    /// Restrict the exposed tools
    pub fn with_tool_filter(mut self, tool_filter: ToolFilter) -> Self {
        self.tool_filter = tool_filter;
        self
    }

    /// Expose only the named tools
    pub fn with_allowed_tools(self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.with_tool_filter(ToolFilter::only(names))
    }

    /// Server name, used in logs and for routing calls
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connection(&self) -> &MCPServerConfig {
        &self.connection
    }

    pub fn tool_filter(&self) -> &ToolFilter {
        &self.tool_filter
    }

    /// Toolsets for every server a config assigns to `agent_name`
    ///
    /// The agent's filter applies to each server. Returns an empty list if
    /// the config has no entry (nor a "default") for the agent.
    pub fn from_config(config: &MCPConfig, agent_name: &str) -> Result<Vec<Self>> {
        let Some(agent_config) = config.get_agent_config(agent_name) else {
            return Ok(Vec::new());
        };

        agent_config
            .mcp_servers
            .iter()
            .map(|server| {
                let connection = config
                    .mcp_servers
                    .get(server)
                    .ok_or_else(|| MCPError::ServerNotFound(server.clone()))?;
                Ok(Self::new(server.clone(), connection.clone())
                    .with_tool_filter(agent_config.tools.clone()))
            })
            .collect()
    }

    fn as_config(&self, agent_name: &str) -> MCPConfig {
        MCPConfig {
            mcp_servers: HashMap::from([(self.name.clone(), self.connection.clone())]),
            agent_configurations: HashMap::from([(
                agent_name.to_string(),
                AgentMCPConfig {
                    mcp_servers: vec![self.name.clone()],
                    tools: self.tool_filter.clone(),
                },
            )]),
        }
    }

    /// Start the server and return its tools
    ///
    /// The returned manager owns the running process; call
    /// [`MCPClientManager::shutdown`] when the agent is done. If the server
    /// fails to start the tool list is empty.
    pub async fn load_tools(
        &self,
        agent_name: &str,
    ) -> Result<(Arc<MCPClientManager>, Vec<Arc<dyn Tool>>)> {
        let manager = Arc::new(MCPClientManager::new(
            Arc::new(self.as_config(agent_name)),
            agent_name,
        ));
        manager.initialize().await?;

        let tools = discover_tools(&manager).await?;
        info!(
            toolset = %self.name,
            agent = agent_name,
            tools = tools.len(),
            "Loaded MCP toolset"
        );

        Ok((manager, tools))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maps_connection() -> MCPServerConfig {
        MCPServerConfig::stdio(
            "npx",
            ["-y", "@modelcontextprotocol/server-google-maps"],
            HashMap::from([("GOOGLE_MAPS_API_KEY".to_string(), "k".to_string())]),
        )
    }

    #[test]
    fn test_as_config_scopes_filter_to_agent() {
        let toolset = MCPToolset::new("google-maps", maps_connection())
            .with_allowed_tools(["maps_geocode"]);

        let config = toolset.as_config("MapsAgent");
        let agent = config.get_agent_config("MapsAgent").unwrap();
        assert_eq!(agent.mcp_servers, vec!["google-maps"]);
        assert!(agent.tools.allows("maps_geocode"));
        assert!(!agent.tools.allows("maps_directions"));
        assert_eq!(config.mcp_servers["google-maps"], maps_connection());
    }

    #[test]
    fn test_from_config() {
        let mut config = MCPConfig::default();
        config
            .mcp_servers
            .insert("google-maps".to_string(), maps_connection());
        config.agent_configurations.insert(
            "MapsAgent".to_string(),
            AgentMCPConfig {
                mcp_servers: vec!["google-maps".to_string()],
                tools: ToolFilter::only(["maps_search_places"]),
            },
        );

        let toolsets = MCPToolset::from_config(&config, "MapsAgent").unwrap();
        assert_eq!(toolsets.len(), 1);
        assert_eq!(toolsets[0].name(), "google-maps");
        assert!(toolsets[0].tool_filter().allows("maps_search_places"));

        assert!(MCPToolset::from_config(&config, "CodeAgent").unwrap().is_empty());
    }

    #[test]
    fn test_from_config_unknown_server() {
        let mut config = MCPConfig::default();
        config.agent_configurations.insert(
            "MapsAgent".to_string(),
            AgentMCPConfig {
                mcp_servers: vec!["missing".to_string()],
                tools: ToolFilter::default(),
            },
        );
        assert!(MCPToolset::from_config(&config, "MapsAgent").is_err());
    }

    #[tokio::test]
    async fn test_load_tools_with_unavailable_server() {
        let toolset = MCPToolset::new(
            "broken",
            MCPServerConfig::stdio(
                "definitely-not-a-real-mcp-server-binary",
                Vec::<String>::new(),
                HashMap::new(),
            ),
        );

        let (manager, tools) = toolset.load_tools("MapsAgent").await.unwrap();
        assert!(tools.is_empty());
        assert!(!manager.has_connections().await);
    }
}
