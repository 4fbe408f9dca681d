//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// Agents take a plain-text request and produce a plain-text answer. The
/// `Context` carries invocation metadata (session, user, the chain of agents
/// that led to this call) and is extended when one agent calls another.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    ///
    /// Names are unique within an agent tree; parents resolve sub-agent
    /// tool calls by this name.
    fn name(&self) -> &str;

    /// Short description used when the agent is exposed as a tool
    fn description(&self) -> &str {
        ""
    }

    /// Shutdown the agent (optional)
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
