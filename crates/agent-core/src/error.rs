//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// The agent/tool graph violates a structural rule
    #[error("Invalid agent configuration: {0}")]
    InvalidConfiguration(String),

    /// A tool name was registered twice for the same agent
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),
}
