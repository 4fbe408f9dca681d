//! Concrete agent implementations
//!
//! - LlmAgent: an instructed model with tools, driven by the AgentExecutor
//! - AgentTool: exposes any agent as a tool of another agent

pub mod agent_tool;
pub mod llm_agent;

pub use agent_tool::AgentTool;
pub use llm_agent::LlmAgent;
