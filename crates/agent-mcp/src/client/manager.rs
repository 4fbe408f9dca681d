//! MCP client manager for coordinating the MCP servers of one agent

use super::stdio::StdioMCPClient;
use super::{ArcMCPClient, MCPToolDefinition, MCPToolResult};
use crate::Result;
use crate::config::{MCPConfig, MCPServerConfig};
use crate::error::MCPError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Information about an MCP tool including its source server
#[derive(Debug, Clone)]
pub struct MCPToolInfo {
    pub server_name: String,
    pub definition: MCPToolDefinition,
}

/// Manages the MCP clients configured for an agent
///
/// The manager handles:
/// - Connection lifecycle for each configured server
/// - Tool discovery across all connected servers, with filtering
/// - Routing tool calls to the server that owns the tool
/// - Graceful degradation when servers fail to start
pub struct MCPClientManager {
    config: Arc<MCPConfig>,

    /// Active clients (server_name -> client)
    clients: RwLock<BTreeMap<String, ArcMCPClient>>,

    /// Agent name (for configuration lookup)
    agent_name: String,
}

impl MCPClientManager {
    /// Create a new MCP client manager
    ///
    /// # Arguments
    ///
    /// * `config` - MCP configuration
    /// * `agent_name` - Name of the agent (used for configuration lookup)
    pub fn new(config: Arc<MCPConfig>, agent_name: impl Into<String>) -> Self {
        Self {
            config,
            clients: RwLock::new(BTreeMap::new()),
            agent_name: agent_name.into(),
        }
    }

    /// Name of the agent this manager serves
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Connect every server configured for this agent
    ///
    /// A server that fails to start is logged and skipped; the agent then
    /// runs without its tools. Referencing a server that is not defined is
    /// a configuration error.
    pub async fn initialize(&self) -> Result<()> {
        let agent_config = self.config.get_agent_config(&self.agent_name).ok_or_else(|| {
            MCPError::ConfigError(format!(
                "No MCP configuration found for agent: {}",
                self.agent_name
            ))
        })?;

        let mut clients = self.clients.write().await;

        for server_name in &agent_config.mcp_servers {
            let server_config = self
                .config
                .mcp_servers
                .get(server_name)
                .ok_or_else(|| MCPError::ServerNotFound(server_name.clone()))?;

            match Self::connect_client(server_config).await {
                Ok(client) => {
                    info!(server = %server_name, agent = %self.agent_name, "Connected MCP server");
                    clients.insert(server_name.clone(), client);
                }
                Err(e) => {
                    warn!(
                        server = %server_name,
                        agent = %self.agent_name,
                        "Failed to connect to MCP server: {}. Continuing without it.",
                        e
                    );
                }
            }
        }

        if clients.is_empty() {
            warn!(
                agent = %self.agent_name,
                "No MCP servers connected; agent will work without MCP tools"
            );
        } else {
            info!(
                agent = %self.agent_name,
                "Connected to {}/{} MCP servers",
                clients.len(),
                agent_config.mcp_servers.len()
            );
        }

        Ok(())
    }

    async fn connect_client(config: &MCPServerConfig) -> Result<ArcMCPClient> {
        let client: ArcMCPClient = Arc::new(StdioMCPClient::from_config(config));
        client.connect().await?;
        Ok(client)
    }

    /// Discover the tools of all connected servers
    ///
    /// Tools rejected by the agent's allow/deny filter are left out. A
    /// server whose listing fails contributes no tools.
    pub async fn discover_tools(&self) -> Result<Vec<MCPToolInfo>> {
        let clients = self.clients.read().await;
        let filter = self
            .config
            .get_agent_config(&self.agent_name)
            .map(|c| c.tools.clone())
            .unwrap_or_default();

        let mut all_tools = Vec::new();
        for (server_name, client) in clients.iter() {
            match client.list_tools().await {
                Ok(tools) => {
                    info!(server = %server_name, count = tools.len(), "Discovered MCP tools");
                    all_tools.extend(
                        tools
                            .into_iter()
                            .filter(|tool| filter.allows(&tool.name))
                            .map(|definition| MCPToolInfo {
                                server_name: server_name.clone(),
                                definition,
                            }),
                    );
                }
                Err(e) => {
                    warn!(server = %server_name, "Failed to list tools: {}", e);
                }
            }
        }

        Ok(all_tools)
    }

    /// Call a tool on the given server
    pub async fn call_tool(
        &self,
        server_name: &str,
        tool_name: &str,
        arguments: Value,
    ) -> Result<MCPToolResult> {
        let client = self
            .clients
            .read()
            .await
            .get(server_name)
            .cloned()
            .ok_or_else(|| MCPError::ServerNotFound(server_name.to_string()))?;

        client.call_tool(tool_name, arguments).await
    }

    /// Names of the connected servers
    pub async fn connected_servers(&self) -> Vec<String> {
        self.clients.read().await.keys().cloned().collect()
    }

    /// Check if any servers are connected
    pub async fn has_connections(&self) -> bool {
        !self.clients.read().await.is_empty()
    }

    /// Disconnect from all servers
    pub async fn shutdown(&self) -> Result<()> {
        let mut clients = self.clients.write().await;

        for (server_name, client) in clients.iter() {
            info!(server = %server_name, "Disconnecting from MCP server");
            if let Err(e) = client.disconnect().await {
                warn!(server = %server_name, "Error disconnecting: {}", e);
            }
        }

        clients.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentMCPConfig, ToolFilter};
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_manager_creation() {
        let manager = MCPClientManager::new(Arc::new(MCPConfig::default()), "MapsAgent");

        assert_eq!(manager.agent_name(), "MapsAgent");
        assert!(!manager.has_connections().await);
        assert!(manager.discover_tools().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_without_agent_config() {
        let manager = MCPClientManager::new(Arc::new(MCPConfig::default()), "MapsAgent");
        let err = manager.initialize().await.unwrap_err();
        assert!(matches!(err, MCPError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_initialize_unknown_server() {
        let mut config = MCPConfig::default();
        config.agent_configurations.insert(
            "MapsAgent".to_string(),
            AgentMCPConfig {
                mcp_servers: vec!["nowhere".to_string()],
                tools: ToolFilter::default(),
            },
        );

        let manager = MCPClientManager::new(Arc::new(config), "MapsAgent");
        let err = manager.initialize().await.unwrap_err();
        assert!(matches!(err, MCPError::ServerNotFound(ref s) if s == "nowhere"));
    }

    #[tokio::test]
    async fn test_failed_server_degrades_gracefully() {
        let mut config = MCPConfig::default();
        config.mcp_servers.insert(
            "broken".to_string(),
            MCPServerConfig::stdio(
                "definitely-not-a-real-mcp-server-binary",
                Vec::<String>::new(),
                HashMap::new(),
            ),
        );
        config.agent_configurations.insert(
            "MapsAgent".to_string(),
            AgentMCPConfig {
                mcp_servers: vec!["broken".to_string()],
                tools: ToolFilter::default(),
            },
        );

        let manager = MCPClientManager::new(Arc::new(config), "MapsAgent");
        manager.initialize().await.unwrap();

        assert!(!manager.has_connections().await);
        let err = manager
            .call_tool("broken", "maps_geocode", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, MCPError::ServerNotFound(_)));
    }
}
