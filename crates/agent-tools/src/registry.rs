//! Tool registry for managing the tools of one agent

use crate::Tool;
use agent_core::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Registry for managing tools
///
/// Tools are kept ordered by name so the declarations sent to the model are
/// stable across runs.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// Fails with [`Error::DuplicateTool`] if a tool with the same name is
    /// already registered; the existing tool is kept.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(Error::DuplicateTool(name));
        }
        debug!(tool = %name, "Registered tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Register every tool in `tools`, stopping at the first collision
    pub fn register_all(&mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Result<()> {
        tools.into_iter().try_for_each(|tool| self.register(tool))
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Whether a tool with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all registered tools, ordered by name
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.values().cloned().collect()
    }

    /// Names of all registered tools, ordered
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Context;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct EchoTool {
        name: &'static str,
    }

    #[async_trait]
    impl Tool for EchoTool {
        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(json!({ "tool": self.name, "params": params }))
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "Echoes its input"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
    }

    fn echo(name: &'static str) -> Arc<dyn Tool> {
        Arc::new(EchoTool { name })
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(echo("get_weather")).unwrap();
        registry.register(echo("SearchAgent")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("get_weather"));
        assert!(registry.get("missing").is_none());
        // Ordered by name
        assert_eq!(registry.names(), vec!["SearchAgent", "get_weather"]);
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("get_weather")).unwrap();

        let err = registry.register(echo("get_weather")).unwrap_err();
        assert!(matches!(err, Error::DuplicateTool(ref n) if n == "get_weather"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_all_stops_on_collision() {
        let mut registry = ToolRegistry::new();
        let result = registry.register_all(vec![echo("a"), echo("b"), echo("a"), echo("c")]);

        assert!(result.is_err());
        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_execute_with_context_defaults_to_execute() {
        let tool = echo("get_weather");
        let ctx = Context::new().child("RootAgent");
        let out = tokio_test::block_on(tool.execute_with_context(json!({"city": "Oslo"}), &ctx))
            .unwrap();
        assert_eq!(out["params"]["city"], "Oslo");
    }
}
