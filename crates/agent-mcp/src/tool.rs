//! MCPTool wrapper that implements the Tool trait

use agent_tools::Tool;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use crate::client::MCPContent;
use crate::client::manager::{MCPClientManager, MCPToolInfo};

/// A tool discovered on an MCP server
///
/// Execution is routed through the [`MCPClientManager`] to the server that
/// listed the tool. A result flagged `isError` becomes an `Err`, so the
/// agent loop reports it to the model as a failed call.
pub struct MCPTool {
    info: MCPToolInfo,
    client_manager: Arc<MCPClientManager>,
}

impl MCPTool {
    pub fn new(info: MCPToolInfo, client_manager: Arc<MCPClientManager>) -> Self {
        Self {
            info,
            client_manager,
        }
    }

    /// Get the server name this tool belongs to
    pub fn server_name(&self) -> &str {
        &self.info.server_name
    }

    /// Flatten MCP content blocks into one JSON value
    ///
    /// Text blocks are joined; images and embedded resources are summarized
    /// rather than inlined.
    fn convert_mcp_result(content: Vec<MCPContent>) -> Value {
        let mut text_parts = Vec::new();
        let mut images = Vec::new();
        let mut resources = Vec::new();

        for block in content {
            match block {
                MCPContent::Text { text } => text_parts.push(text),
                MCPContent::Image { data, mime_type } => images.push(json!({
                    "mimeType": mime_type,
                    "dataLength": data.len(),
                })),
                MCPContent::Resource { resource } => resources.push(resource),
                MCPContent::Unsupported => {}
            }
        }

        let mut result = json!({ "text": text_parts.join("\n") });
        if !images.is_empty() {
            result["images"] = Value::Array(images);
        }
        if !resources.is_empty() {
            result["resources"] = Value::Array(resources);
        }
        result
    }

    fn error_text(content: &[MCPContent]) -> String {
        let text: Vec<&str> = content
            .iter()
            .filter_map(|c| match c {
                MCPContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        if text.is_empty() {
            "unknown error".to_string()
        } else {
            text.join("\n")
        }
    }
}

#[async_trait]
impl Tool for MCPTool {
    async fn execute(&self, params: Value) -> agent_core::Result<Value> {
        debug!(
            tool = %self.info.definition.name,
            server = %self.info.server_name,
            "Calling MCP tool"
        );

        let result = self
            .client_manager
            .call_tool(&self.info.server_name, &self.info.definition.name, params)
            .await?;

        if result.is_error.unwrap_or(false) {
            return Err(agent_core::Error::ProcessingFailed(format!(
                "MCP tool '{}' returned error: {}",
                self.info.definition.name,
                Self::error_text(&result.content)
            )));
        }

        Ok(Self::convert_mcp_result(result.content))
    }

    fn name(&self) -> &str {
        &self.info.definition.name
    }

    fn description(&self) -> &str {
        self.info
            .definition
            .description
            .as_deref()
            .unwrap_or("No description available")
    }

    fn input_schema(&self) -> Value {
        self.info.definition.input_schema.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MCPToolDefinition;
    use crate::config::MCPConfig;

    fn manager() -> Arc<MCPClientManager> {
        Arc::new(MCPClientManager::new(Arc::new(MCPConfig::default()), "MapsAgent"))
    }

    #[test]
    fn test_convert_text_blocks() {
        let result = MCPTool::convert_mcp_result(vec![
            MCPContent::Text {
                text: "Mountain View, CA".to_string(),
            },
            MCPContent::Text {
                text: "37.3861,-122.0839".to_string(),
            },
        ]);

        assert_eq!(result["text"], "Mountain View, CA\n37.3861,-122.0839");
        assert!(result.get("images").is_none());
    }

    #[test]
    fn test_convert_mixed_content() {
        let result = MCPTool::convert_mcp_result(vec![
            MCPContent::Text {
                text: "map".to_string(),
            },
            MCPContent::Image {
                data: "aGVsbG8=".to_string(),
                mime_type: "image/png".to_string(),
            },
            MCPContent::Resource {
                resource: json!({"uri": "maps://route/1", "text": "route"}),
            },
            MCPContent::Unsupported,
        ]);

        assert_eq!(result["images"][0]["dataLength"], 8);
        assert_eq!(result["resources"][0]["uri"], "maps://route/1");
    }

    #[test]
    fn test_metadata() {
        let tool = MCPTool::new(
            MCPToolInfo {
                server_name: "google-maps".to_string(),
                definition: MCPToolDefinition {
                    name: "maps_geocode".to_string(),
                    description: None,
                    input_schema: json!({"type": "object", "properties": {"address": {"type": "string"}}}),
                },
            },
            manager(),
        );

        assert_eq!(tool.name(), "maps_geocode");
        assert_eq!(tool.server_name(), "google-maps");
        assert_eq!(tool.description(), "No description available");
        assert!(tool.input_schema()["properties"]["address"].is_object());
    }

    #[tokio::test]
    async fn test_execute_without_server_fails() {
        let tool = MCPTool::new(
            MCPToolInfo {
                server_name: "google-maps".to_string(),
                definition: MCPToolDefinition {
                    name: "maps_geocode".to_string(),
                    description: Some("Geocode an address".to_string()),
                    input_schema: json!({}),
                },
            },
            manager(),
        );

        let err = tool.execute(json!({"address": "x"})).await.unwrap_err();
        assert!(err.to_string().contains("google-maps"));
    }
}
