//! Agent-as-tool adapter

use agent_core::{Agent, Context, Error, Result};
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct AgentToolInput {
    request: String,
}

/// Exposes an agent as a tool of another agent
///
/// The tool carries the agent's name and description. The parent model
/// passes `{"request": "..."}`; the sub-agent runs a full turn of its own in
/// a child context and its final text becomes the tool result.
pub struct AgentTool {
    agent: Arc<dyn Agent>,
}

impl AgentTool {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self { agent }
    }

    /// The wrapped agent
    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }
}

#[async_trait]
impl Tool for AgentTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        self.execute_with_context(params, &Context::new()).await
    }

    async fn execute_with_context(&self, params: Value, context: &Context) -> Result<Value> {
        let input: AgentToolInput = serde_json::from_value(params).map_err(|e| {
            Error::ProcessingFailed(format!(
                "Invalid input for agent '{}': {e}",
                self.agent.name()
            ))
        })?;

        let mut child = context.child(self.agent.name());
        debug!(agent = %self.agent.name(), depth = child.depth(), "Delegating to sub-agent");

        let answer = self.agent.process(input.request, &mut child).await?;
        Ok(Value::String(answer))
    }

    fn name(&self) -> &str {
        self.agent.name()
    }

    fn description(&self) -> &str {
        self.agent.description()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "request": {
                    "type": "string",
                    "description": "The request to hand to this agent"
                }
            },
            "required": ["request"]
        })
    }
}
