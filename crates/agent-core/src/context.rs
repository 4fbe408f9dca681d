//! Invocation context for agents
//!
//! A `Context` travels with every `Agent::process` call. It records who is
//! talking (session and user ids), which agents are on the call stack, and
//! a free-form JSON state map that tools may read or extend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known state keys
pub mod keys {
    /// Session ID for tracking
    pub const SESSION_ID: &str = "session_id";
    /// User ID for personalization
    pub const USER_ID: &str = "user_id";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let root = Context::new().with_session_id("session-123");
/// let child = root.child("SearchAgent");
///
/// assert_eq!(child.session_id(), Some("session-123"));
/// assert_eq!(child.invocation_path(), ["SearchAgent"]);
/// assert_eq!(child.depth(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    state: HashMap<String, serde_json::Value>,
    path: Vec<String>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.insert(keys::SESSION_ID, serde_json::json!(session_id.into()));
        self
    }

    /// Set the user ID
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.insert(keys::USER_ID, serde_json::json!(user_id.into()));
        self
    }

    /// Get the session ID
    pub fn session_id(&self) -> Option<&str> {
        self.get(keys::SESSION_ID).and_then(|v| v.as_str())
    }

    /// Get the user ID
    pub fn user_id(&self) -> Option<&str> {
        self.get(keys::USER_ID).and_then(|v| v.as_str())
    }

    // =========== Invocation path ===========

    /// Derive the context for a nested agent invocation
    ///
    /// The child shares a copy of the state and extends the invocation path
    /// with `agent_name`.
    pub fn child(&self, agent_name: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(agent_name.into());
        Self {
            state: self.state.clone(),
            path,
        }
    }

    /// Names of the agents invoked so far, outermost first
    pub fn invocation_path(&self) -> &[String] {
        &self.path
    }

    /// Nesting depth (0 for a top-level request)
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    // =========== State ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.state.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.state.get(key)
    }

    /// Insert a typed value, serialized to JSON
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.state.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value, deserialized from JSON
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        self.state
            .get(key)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })
            })
            .transpose()
    }

    /// Remove a value from the context
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.state.remove(key)
    }
}
