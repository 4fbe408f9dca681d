//! Declarative agent descriptions
//!
//! An [`AgentDescriptor`] says what an agent is (name, description,
//! instruction, model) and what it may call. Descriptors are plain data:
//! building one starts nothing. [`crate::AgentRuntime::build_agent`] turns a
//! descriptor tree into running agents.

use agent_core::{Error, Result};
use agent_llm::BuiltinTool;
use agent_mcp::MCPToolset;
use agent_tools::Tool;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Something an agent can call
#[derive(Clone)]
pub enum ToolReference {
    /// A tool implemented in-process
    Function(Arc<dyn Tool>),
    /// A capability executed by the model provider
    BuiltIn(BuiltinTool),
    /// Another agent, exposed as a tool
    Agent(Arc<AgentDescriptor>),
    /// Every (filtered) tool of an MCP server
    McpToolset(MCPToolset),
}

impl ToolReference {
    /// The tool name the model will see, when known before start-up
    ///
    /// MCP toolsets only learn their tool names once the server runs.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Function(tool) => Some(tool.name()),
            Self::BuiltIn(builtin) => Some(builtin.as_str()),
            Self::Agent(agent) => Some(agent.name()),
            Self::McpToolset(_) => None,
        }
    }
}

impl fmt::Debug for ToolReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(tool) => f.debug_tuple("Function").field(&tool.name()).finish(),
            Self::BuiltIn(builtin) => f.debug_tuple("BuiltIn").field(builtin).finish(),
            Self::Agent(agent) => f.debug_tuple("Agent").field(&agent.name()).finish(),
            Self::McpToolset(toolset) => f.debug_tuple("McpToolset").field(&toolset.name()).finish(),
        }
    }
}

/// Immutable description of one agent
#[derive(Debug, Clone)]
pub struct AgentDescriptor {
    name: String,
    description: String,
    instruction: Option<String>,
    model: String,
    tools: Vec<ToolReference>,
}

impl AgentDescriptor {
    /// Start describing an agent
    pub fn builder(name: impl Into<String>) -> AgentDescriptorBuilder {
        AgentDescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &[ToolReference] {
        &self.tools
    }

    /// Direct sub-agents, in declaration order
    pub fn sub_agents(&self) -> impl Iterator<Item = &Arc<AgentDescriptor>> {
        self.tools.iter().filter_map(|tool| match tool {
            ToolReference::Agent(agent) => Some(agent),
            _ => None,
        })
    }

    /// Built-in capabilities this agent enables
    pub fn builtin_tools(&self) -> Vec<BuiltinTool> {
        self.tools
            .iter()
            .filter_map(|tool| match tool {
                ToolReference::BuiltIn(builtin) => Some(*builtin),
                _ => None,
            })
            .collect()
    }

    /// Check the rules that concern this agent alone
    ///
    /// - the name is an identifier and the model is non-empty
    /// - statically known tool names are unique
    /// - a built-in capability is the agent's only tool
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.name) {
            return Err(Error::InvalidConfiguration(format!(
                "agent name '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                self.name
            )));
        }
        if self.model.trim().is_empty() {
            return Err(Error::InvalidConfiguration(format!(
                "agent '{}' has no model",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for name in self.tools.iter().filter_map(ToolReference::name) {
            if !seen.insert(name) {
                return Err(Error::DuplicateTool(format!("{name} (agent '{}')", self.name)));
            }
        }

        if let Some(builtin) = self.builtin_tools().first() {
            if self.tools.len() > 1 {
                return Err(Error::InvalidConfiguration(format!(
                    "agent '{}' uses built-in tool '{builtin}' alongside other tools",
                    self.name
                )));
            }
        }

        Ok(())
    }

    /// Validate this agent and every agent reachable from it
    ///
    /// On top of [`AgentDescriptor::validate`] for each agent, agent names
    /// must be unique across the whole tree.
    pub fn validate_tree(&self) -> Result<()> {
        let mut names = HashSet::new();
        self.visit(&mut names)
    }

    fn visit<'a>(&'a self, names: &mut HashSet<&'a str>) -> Result<()> {
        self.validate()?;
        if !names.insert(self.name.as_str()) {
            return Err(Error::InvalidConfiguration(format!(
                "agent name '{}' is used more than once",
                self.name
            )));
        }
        for sub_agent in self.sub_agents() {
            sub_agent.visit(names)?;
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Builder for AgentDescriptor
pub struct AgentDescriptorBuilder {
    name: String,
    description: String,
    instruction: Option<String>,
    model: String,
    tools: Vec<ToolReference>,
}

impl AgentDescriptorBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            instruction: None,
            model: String::new(),
            tools: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the instruction (system prompt)
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Add any tool reference
    pub fn tool(mut self, tool: ToolReference) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add an in-process tool
    pub fn function_tool(self, tool: Arc<dyn Tool>) -> Self {
        self.tool(ToolReference::Function(tool))
    }

    /// Enable a provider built-in
    pub fn builtin_tool(self, builtin: BuiltinTool) -> Self {
        self.tool(ToolReference::BuiltIn(builtin))
    }

    /// Add a sub-agent, exposed as a tool
    pub fn sub_agent(self, agent: Arc<AgentDescriptor>) -> Self {
        self.tool(ToolReference::Agent(agent))
    }

    /// Add the tools of an MCP server
    pub fn mcp_toolset(self, toolset: MCPToolset) -> Self {
        self.tool(ToolReference::McpToolset(toolset))
    }

    /// Build and validate the descriptor
    pub fn build(self) -> Result<AgentDescriptor> {
        let descriptor = AgentDescriptor {
            name: self.name,
            description: self.description,
            instruction: self.instruction,
            model: self.model,
            tools: self.tools,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_mcp::MCPServerConfig;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        async fn execute(&self, _params: Value) -> Result<Value> {
            Ok(json!({}))
        }

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
    }

    fn leaf(name: &str, builtin: BuiltinTool) -> Arc<AgentDescriptor> {
        Arc::new(
            AgentDescriptor::builder(name)
                .model("gemini-2.0-flash")
                .builtin_tool(builtin)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_build_and_accessors() {
        let search = leaf("SearchAgent", BuiltinTool::GoogleSearch);
        let root = AgentDescriptor::builder("RootAgent")
            .description("Root Agent")
            .model("gemini-2.5-pro-preview-05-06")
            .sub_agent(search)
            .function_tool(Arc::new(NamedTool("get_weather")))
            .build()
            .unwrap();

        assert_eq!(root.name(), "RootAgent");
        assert!(root.instruction().is_none());
        assert_eq!(root.tools().len(), 2);
        assert_eq!(root.sub_agents().count(), 1);
        assert!(root.builtin_tools().is_empty());
        root.validate_tree().unwrap();
    }

    #[test]
    fn test_rejects_bad_names_and_missing_model() {
        let err = AgentDescriptor::builder("Maps Agent")
            .model("m")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        assert!(AgentDescriptor::builder("1Agent").model("m").build().is_err());
        assert!(AgentDescriptor::builder("").model("m").build().is_err());
        assert!(AgentDescriptor::builder("_ok_1").model("m").build().is_ok());

        let err = AgentDescriptor::builder("CodeAgent").build().unwrap_err();
        assert!(err.to_string().contains("has no model"));
    }

    #[test]
    fn test_rejects_tool_name_collision() {
        let err = AgentDescriptor::builder("RootAgent")
            .model("m")
            .function_tool(Arc::new(NamedTool("SearchAgent")))
            .sub_agent(leaf("SearchAgent", BuiltinTool::GoogleSearch))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateTool(ref n) if n.starts_with("SearchAgent")));
    }

    #[test]
    fn test_builtin_must_be_only_tool() {
        let err = AgentDescriptor::builder("SearchAgent")
            .model("m")
            .builtin_tool(BuiltinTool::GoogleSearch)
            .function_tool(Arc::new(NamedTool("get_weather")))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("built-in tool 'google_search'"));

        let err = AgentDescriptor::builder("SearchAgent")
            .model("m")
            .builtin_tool(BuiltinTool::GoogleSearch)
            .mcp_toolset(MCPToolset::new(
                "maps",
                MCPServerConfig::stdio("npx", ["-y", "pkg"], HashMap::new()),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_duplicate_agent_names_anywhere_in_tree() {
        let inner = Arc::new(
            AgentDescriptor::builder("Helper")
                .model("m")
                .sub_agent(leaf("CodeAgent", BuiltinTool::CodeExecution))
                .build()
                .unwrap(),
        );
        let root = AgentDescriptor::builder("RootAgent")
            .model("m")
            .sub_agent(inner)
            .sub_agent(leaf("CodeAgent", BuiltinTool::CodeExecution))
            .build()
            .unwrap();

        let err = root.validate_tree().unwrap_err();
        assert!(err.to_string().contains("'CodeAgent' is used more than once"));
    }

    #[test]
    fn test_root_name_reused_by_descendant() {
        let nested = Arc::new(AgentDescriptor::builder("RootAgent").model("m").build().unwrap());
        let root = AgentDescriptor::builder("RootAgent")
            .model("m")
            .sub_agent(nested)
            .build()
            .unwrap();
        // Only the tree check sees this
        assert!(root.validate().is_ok());
        assert!(root.validate_tree().is_err());
    }
}
