//! Tool discovery
//!
//! Turns the tool listings of a manager's servers into [`Tool`] objects
//! an agent can register.

use agent_tools::Tool;
use std::sync::Arc;
use tracing::debug;

use crate::Result;
use crate::client::manager::MCPClientManager;
use crate::tool::MCPTool;

/// Discover the manager's (filtered) tools and wrap them as [`MCPTool`]s
pub async fn discover_tools(client_manager: &Arc<MCPClientManager>) -> Result<Vec<Arc<dyn Tool>>> {
    let tools = client_manager.discover_tools().await?;

    Ok(tools
        .into_iter()
        .map(|info| {
            debug!(
                tool = %info.definition.name,
                server = %info.server_name,
                "Wrapping MCP tool"
            );
            Arc::new(MCPTool::new(info, client_manager.clone())) as Arc<dyn Tool>
        })
        .collect())
}
