//! LLM agent implementation (wraps AgentExecutor)

use crate::executor::{AgentExecutor, ExecutorEventHandler};
use agent_core::{Agent, Context, Result};
use agent_llm::Message;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

/// An agent backed by a model, its instruction and its tools
///
/// Each `process` call is an independent turn: the agent keeps no
/// conversation between calls. Hosts that want multi-turn sessions keep
/// the history themselves and use [`LlmAgent::run_turn`].
pub struct LlmAgent {
    name: String,
    description: String,
    executor: AgentExecutor,
}

impl LlmAgent {
    /// Create a new LLM agent
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the agent, unique within its tree
    /// * `description` - What the agent does, shown to parent agents
    /// * `executor` - The agent loop with the agent's model and tools
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        executor: AgentExecutor,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            executor,
        }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }

    /// Run one turn on a host-owned conversation
    ///
    /// `conversation` must end with the user's message; the agent's replies
    /// and tool traffic are appended to it.
    pub async fn run_turn(
        &self,
        conversation: &mut Vec<Message>,
        context: &Context,
        handler: Option<Arc<dyn ExecutorEventHandler>>,
    ) -> Result<String> {
        self.executor.run_turn(conversation, context, handler).await
    }
}

#[async_trait]
impl Agent for LlmAgent {
    #[instrument(skip(self, input, context), fields(agent = %self.name, depth = context.depth()))]
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        info!(path = ?context.invocation_path(), "Agent invoked");
        self.executor.run(input, context).await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Debug for LlmAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmAgent")
            .field("name", &self.name)
            .field("model", &self.executor.config().model)
            .field("tools", self.executor.tools())
            .finish_non_exhaustive()
    }
}
