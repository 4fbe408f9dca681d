//! Agent runtime for building and running agent trees
//!
//! This crate provides the runtime infrastructure for executing agents:
//! the AgentExecutor for the model/tool loop, declarative AgentDescriptors,
//! and the AgentRuntime that turns descriptor trees into running agents.

pub mod agents;
pub mod descriptor;
pub mod executor;
pub mod runtime;

#[cfg(test)]
mod testing;

// Re-export key types
pub use agents::{AgentTool, LlmAgent};
pub use descriptor::{AgentDescriptor, AgentDescriptorBuilder, ToolReference};
pub use executor::{
    AgentExecutor, AgentExecutorBuilder, ExecutorConfig, ExecutorEventHandler,
    MAX_ITERATIONS_MESSAGE, NoOpEventHandler, TRUNCATED_MESSAGE,
};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
