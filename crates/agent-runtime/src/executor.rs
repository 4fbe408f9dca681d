//! Agent executor for running agent loops
//!
//! The AgentExecutor implements the core agent loop pattern:
//! 1. Call LLM with conversation history, function tools and built-ins
//! 2. Check stop reason
//! 3. If tool use requested, execute tools, append the results and loop back
//! 4. If completed, return final response

use agent_core::{Context, Result};
use agent_llm::{
    BuiltinTool, CompletionRequest, ContentBlock, LLMProvider, Message, StopReason,
    ToolDefinition,
};
use agent_tools::ToolRegistry;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Returned when the loop runs out of iterations
pub const MAX_ITERATIONS_MESSAGE: &str = "Max iterations reached without completion";

/// Returned when the model hits its token limit before producing any text
pub const TRUNCATED_MESSAGE: &str = "Response truncated due to token limit";

/// Event handler for agent execution events
///
/// Implement this trait to receive callbacks during agent execution,
/// useful for showing tool activity to a user.
#[async_trait]
pub trait ExecutorEventHandler: Send + Sync {
    /// Called when a tool execution starts
    async fn on_tool_start(&self, _id: &str, _name: &str, _input: &Value) {}

    /// Called when a tool execution completes
    async fn on_tool_done(
        &self,
        _id: &str,
        _name: &str,
        _result: std::result::Result<&Value, &str>,
        _duration_ms: u64,
    ) {
    }

    /// Called when the agent completes
    async fn on_complete(&self, _result: &str) {}

    /// Called when an error occurs
    async fn on_error(&self, _error: &str) {}
}

/// No-op event handler for when events are not needed
pub struct NoOpEventHandler;

#[async_trait]
impl ExecutorEventHandler for NoOpEventHandler {}

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of model calls per turn
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// System prompt (the agent's instruction)
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature (provider default when unset)
    pub temperature: Option<f32>,

    /// Provider-side capabilities enabled for every request
    pub builtin_tools: Vec<BuiltinTool>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "gemini-2.0-flash".to_string(),
            system_prompt: None,
            max_tokens: 8192,
            temperature: None,
            builtin_tools: Vec::new(),
        }
    }
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
            event_handler: None,
        }
    }

    /// Create a builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Set the event handler for receiving execution events
    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Get the executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Get the tools this executor can dispatch to
    pub fn tools(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Execute the agent loop for a single user message
    pub async fn run(&self, user_message: String, context: &Context) -> Result<String> {
        self.run_with_history(user_message, Vec::new(), context)
            .await
    }

    /// Execute the agent loop with conversation history
    pub async fn run_with_history(
        &self,
        user_message: String,
        history: Vec<Message>,
        context: &Context,
    ) -> Result<String> {
        let mut conversation = history;
        conversation.push(Message::user(user_message));
        self.run_turn(&mut conversation, context, self.event_handler.clone())
            .await
    }

    /// Execute the agent loop with conversation history and a custom event handler
    pub async fn run_with_history_and_handler(
        &self,
        user_message: String,
        history: Vec<Message>,
        context: &Context,
        handler: Arc<dyn ExecutorEventHandler>,
    ) -> Result<String> {
        let mut conversation = history;
        conversation.push(Message::user(user_message));
        self.run_turn(&mut conversation, context, Some(handler)).await
    }

    /// Run the loop on `conversation`, whose last message is the user's
    ///
    /// Every assistant message and tool result produced along the way is
    /// appended, so callers can keep the conversation for the next turn.
    pub async fn run_turn(
        &self,
        conversation: &mut Vec<Message>,
        context: &Context,
        event_handler: Option<Arc<dyn ExecutorEventHandler>>,
    ) -> Result<String> {
        let tools = self.build_tool_definitions();
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > self.config.max_iterations {
                warn!(
                    max_iterations = self.config.max_iterations,
                    "Max iterations reached, stopping"
                );
                return Ok(MAX_ITERATIONS_MESSAGE.to_string());
            }

            debug!(
                iteration,
                max_iterations = self.config.max_iterations,
                path = ?context.invocation_path(),
                "Agent iteration started"
            );

            let request = self.build_request(conversation, &tools);
            info!(
                model = %self.config.model,
                tool_count = tools.len(),
                builtin_tools = ?self.config.builtin_tools,
                "Sending request to LLM"
            );

            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(e) => {
                    if let Some(handler) = &event_handler {
                        handler.on_error(&e.to_string()).await;
                    }
                    return Err(e.into());
                }
            };

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            let message = response.message;
            let text = message.text();
            let has_tool_uses = message.has_tool_uses();
            conversation.push(message);

            match response.stop_reason {
                StopReason::ToolUse if has_tool_uses => {
                    let Some(assistant) = conversation.last() else {
                        continue;
                    };
                    let results = self
                        .execute_tools(assistant, context, event_handler.as_ref())
                        .await;
                    conversation.push(Message::tool_results(results));
                }

                StopReason::MaxTokens => {
                    warn!("Hit max tokens in LLM response");
                    return Ok(text.unwrap_or_else(|| TRUNCATED_MESSAGE.to_string()));
                }

                StopReason::ToolUse | StopReason::EndTurn | StopReason::StopSequence => {
                    let text = text.unwrap_or_default();
                    info!(iteration, response_length = text.len(), "Agent completed");
                    if let Some(handler) = &event_handler {
                        handler.on_complete(&text).await;
                    }
                    return Ok(text);
                }
            }
        }
    }

    fn build_request(&self, conversation: &[Message], tools: &[ToolDefinition]) -> CompletionRequest {
        let mut builder = CompletionRequest::builder(&self.config.model)
            .messages(conversation.to_vec())
            .max_tokens(self.config.max_tokens);

        if let Some(system) = &self.config.system_prompt {
            builder = builder.system(system.clone());
        }
        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }
        if !tools.is_empty() {
            builder = builder.tools(tools.to_vec());
        }
        if !self.config.builtin_tools.is_empty() {
            builder = builder.builtin_tools(self.config.builtin_tools.clone());
        }

        builder.build()
    }

    /// Build tool definitions from the registry
    fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    /// Execute every tool call in an assistant message
    ///
    /// Failures, including calls to tools that do not exist, become error
    /// results for the model rather than aborting the turn.
    async fn execute_tools(
        &self,
        message: &Message,
        context: &Context,
        event_handler: Option<&Arc<dyn ExecutorEventHandler>>,
    ) -> Vec<ContentBlock> {
        let mut results = Vec::new();

        for tool_use in message.tool_uses() {
            let ContentBlock::ToolUse { id, name, input } = tool_use else {
                continue;
            };

            let input_preview: String = input.to_string().chars().take(500).collect();
            info!(
                tool_name = %name,
                tool_id = %id,
                input_preview = %input_preview,
                "Executing tool"
            );

            if let Some(handler) = event_handler {
                handler.on_tool_start(id, name, input).await;
            }

            let start_time = Instant::now();
            let outcome = match self.tool_registry.get(name) {
                Some(tool) => tool
                    .execute_with_context(input.clone(), context)
                    .await
                    .map_err(|e| e.to_string()),
                None => Err(format!("Tool not found: {name}")),
            };
            let duration_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);

            match outcome {
                Ok(result) => {
                    let result_str = match &result {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    info!(
                        tool_name = %name,
                        duration_ms,
                        result_length = result_str.len(),
                        "Tool execution succeeded"
                    );

                    if let Some(handler) = event_handler {
                        handler.on_tool_done(id, name, Ok(&result), duration_ms).await;
                    }
                    results.push(ContentBlock::tool_result(id.clone(), result_str));
                }
                Err(error) => {
                    warn!(
                        tool_name = %name,
                        duration_ms,
                        error = %error,
                        "Tool execution failed"
                    );

                    if let Some(handler) = event_handler {
                        handler.on_tool_done(id, name, Err(&error), duration_ms).await;
                    }
                    results.push(ContentBlock::tool_error(id.clone(), format!("Error: {error}")));
                }
            }
        }

        results
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
            event_handler: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Enable a provider-side capability
    pub fn builtin_tool(mut self, tool: BuiltinTool) -> Self {
        self.config.builtin_tools.push(tool);
        self
    }

    /// Set the event handler
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self.provider.ok_or_else(|| {
            agent_core::Error::InitializationFailed("Provider not set".to_string())
        })?;

        let executor = AgentExecutor::new(provider, self.tool_registry, self.config);
        Ok(match self.event_handler {
            Some(handler) => executor.with_event_handler(handler),
            None => executor,
        })
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
