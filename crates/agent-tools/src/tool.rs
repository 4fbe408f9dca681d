//! Tool trait definition

use agent_core::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools that agents can execute
///
/// Each tool provides a name, a description and a JSON schema for its
/// input. The model sees those three; the agent loop calls `execute` with
/// the arguments the model produced.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    ///
    /// # Returns
    ///
    /// Tool output as JSON value
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Execute the tool on behalf of an agent invocation
    ///
    /// Tools that need the caller's context (agents wrapped as tools) override
    /// this; everything else falls through to [`Tool::execute`].
    async fn execute_with_context(&self, params: Value, _context: &Context) -> Result<Value> {
        self.execute(params).await
    }

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description helps the LLM understand when to use this tool
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    ///
    /// // Schema for the weather lookup:
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": {
    ///         "city": { "type": "string", "description": "The name of city." }
    ///     },
    ///     "required": ["city"]
    /// });
    /// ```
    fn input_schema(&self) -> Value;
}
