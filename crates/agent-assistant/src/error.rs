//! Error types for the assistant

use thiserror::Error;

/// Assistant specific errors
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Transport failure or a body that is not JSON
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid tool parameters or configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the agent runtime
    #[error("Agent error: {0}")]
    Agent(#[from] agent_core::Error),
}

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

impl From<AssistantError> for agent_core::Error {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Agent(inner) => inner,
            AssistantError::Config(msg) => agent_core::Error::InvalidConfiguration(msg),
            AssistantError::Http(e) => agent_core::Error::ProcessingFailed(e.to_string()),
        }
    }
}
