//! Runtime that turns agent descriptors into running agents
//!
//! The AgentRuntime owns the shared resources: the LLM provider, defaults
//! for the agent loop, and every MCP server started on behalf of an agent.

use agent_core::Result;
use agent_llm::LLMProvider;
use agent_mcp::MCPClientManager;
use agent_tools::ToolRegistry;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::agents::{AgentTool, LlmAgent};
use crate::descriptor::{AgentDescriptor, ToolReference};
use crate::executor::{AgentExecutor, ExecutorConfig, ExecutorEventHandler};

/// Configuration for the agent runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Maximum model calls per agent turn
    pub max_iterations: usize,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature for every agent (provider default when unset)
    pub temperature: Option<f32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let executor = ExecutorConfig::default();
        Self {
            max_iterations: executor.max_iterations,
            max_tokens: executor.max_tokens,
            temperature: executor.temperature,
        }
    }
}

/// Runtime for building and running agent trees
///
/// # Example
///
/// ```no_run
/// use agent_core::{Agent, Context};
/// use agent_llm::BuiltinTool;
/// use agent_runtime::{AgentDescriptor, AgentRuntime};
/// use std::sync::Arc;
///
/// # async fn example(provider: Arc<dyn agent_llm::LLMProvider>) -> agent_core::Result<()> {
/// let runtime = AgentRuntime::builder().provider(provider).build()?;
///
/// let code = AgentDescriptor::builder("CodeAgent")
///     .model("gemini-2.0-flash")
///     .instruction("You're a specialist in Code Execution")
///     .builtin_tool(BuiltinTool::CodeExecution)
///     .build()?;
///
/// let agent = runtime.build_agent(&code).await?;
/// let answer = agent.process("What is 2**32?".to_string(), &mut Context::new()).await?;
/// println!("{answer}");
///
/// runtime.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct AgentRuntime {
    provider: Arc<dyn LLMProvider>,
    config: RuntimeConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
    mcp_managers: Mutex<Vec<Arc<MCPClientManager>>>,
}

impl AgentRuntime {
    /// Create a new agent runtime
    pub fn new(provider: Arc<dyn LLMProvider>, config: RuntimeConfig) -> Self {
        Self {
            provider,
            config,
            event_handler: None,
            mcp_managers: Mutex::new(Vec::new()),
        }
    }

    /// Create a new runtime builder
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// Get a reference to the LLM provider
    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Get a reference to the runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Build a running agent from a descriptor tree
    ///
    /// The tree is validated first. Agents are then built bottom-up: each
    /// sub-agent becomes an [`AgentTool`] of its parent, and MCP toolsets
    /// start their servers and contribute the discovered tools. A tool-name
    /// collision, including one introduced by an MCP server, fails the build.
    pub async fn build_agent(&self, descriptor: &AgentDescriptor) -> Result<Arc<LlmAgent>> {
        descriptor.validate_tree()?;
        self.build_node(descriptor).await
    }

    fn build_node<'a>(
        &'a self,
        descriptor: &'a AgentDescriptor,
    ) -> BoxFuture<'a, Result<Arc<LlmAgent>>> {
        Box::pin(async move {
            let mut registry = ToolRegistry::new();

            for tool in descriptor.tools() {
                match tool {
                    ToolReference::Function(function) => registry.register(function.clone())?,
                    ToolReference::BuiltIn(_) => {}
                    ToolReference::Agent(sub_agent) => {
                        let agent = self.build_node(sub_agent).await?;
                        registry.register(Arc::new(AgentTool::new(agent)))?;
                    }
                    ToolReference::McpToolset(toolset) => {
                        let (manager, tools) = toolset.load_tools(descriptor.name()).await?;
                        self.mcp_managers.lock().await.push(manager);
                        registry.register_all(tools)?;
                    }
                }
            }

            let config = ExecutorConfig {
                max_iterations: self.config.max_iterations,
                model: descriptor.model().to_string(),
                system_prompt: descriptor.instruction().map(str::to_string),
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
                builtin_tools: descriptor.builtin_tools(),
            };

            info!(
                agent = %descriptor.name(),
                model = %config.model,
                tools = ?registry.names(),
                builtin_tools = ?config.builtin_tools,
                "Built agent"
            );

            let mut executor =
                AgentExecutor::new(self.provider.clone(), Arc::new(registry), config);
            if let Some(handler) = &self.event_handler {
                executor = executor.with_event_handler(handler.clone());
            }

            Ok(Arc::new(LlmAgent::new(
                descriptor.name(),
                descriptor.description(),
                executor,
            )))
        })
    }

    /// Number of MCP toolsets started by this runtime
    pub async fn mcp_manager_count(&self) -> usize {
        self.mcp_managers.lock().await.len()
    }

    /// Disconnect every MCP server started by this runtime
    pub async fn shutdown(&self) -> Result<()> {
        let managers: Vec<_> = self.mcp_managers.lock().await.drain(..).collect();
        for manager in managers {
            if let Err(e) = manager.shutdown().await {
                warn!(agent = %manager.agent_name(), "Failed to shut down MCP servers: {}", e);
            }
        }
        Ok(())
    }
}

/// Builder for AgentRuntime
pub struct AgentRuntimeBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    config: RuntimeConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentRuntimeBuilder {
    /// Create a new runtime builder
    pub fn new() -> Self {
        Self {
            provider: None,
            config: RuntimeConfig::default(),
            event_handler: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the maximum model calls per agent turn
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Receive tool and completion events from every agent built
    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the runtime
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is not set
    pub fn build(self) -> Result<AgentRuntime> {
        let provider = self.provider.ok_or_else(|| {
            agent_core::Error::InitializationFailed("Provider not set".to_string())
        })?;

        let mut runtime = AgentRuntime::new(provider, self.config);
        runtime.event_handler = self.event_handler;
        Ok(runtime)
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
