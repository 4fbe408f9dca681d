//! Google Gemini provider implementation
//!
//! This module implements the LLMProvider trait for Gemini models through the
//! `generateContent` endpoint of the Generative Language API.
//! See: https://ai.google.dev/api/generate-content
//!
//! # Example
//!
//! ```no_run
//! use agent_llm::{CompletionRequest, LLMProvider, Message};
//! use agent_llm::providers::GeminiProvider;
//!
//! # async fn example() -> agent_llm::Result<()> {
//! // Reads GOOGLE_API_KEY (and optionally GEMINI_API_BASE)
//! let provider = GeminiProvider::from_env()?;
//!
//! let request = CompletionRequest::builder("gemini-2.0-flash")
//!     .add_message(Message::user("Hello!"))
//!     .max_tokens(256)
//!     .build();
//!
//! let response = provider.complete(request).await?;
//! println!("{}", response.message.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use crate::{
    BuiltinTool, CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider,
    Message, Result, Role, StopReason, TokenUsage, ToolDefinition,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Prefix for tool-use ids minted locally when Gemini omits one.
/// Such ids are never echoed back to the API.
const LOCAL_ID_PREFIX: &str = "local-";

/// Schema keywords the Gemini function-declaration dialect rejects
const UNSUPPORTED_SCHEMA_KEYS: &[&str] = &["$schema", "additionalProperties"];

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,

    /// Base URL (default: "https://generativelanguage.googleapis.com/v1beta")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `GOOGLE_API_KEY` and, if set, the base URL
    /// from `GEMINI_API_BASE`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LLMError::ConfigurationError(
                    "GOOGLE_API_KEY environment variable not set".to_string(),
                )
            })?;

        let api_base = std::env::var("GEMINI_API_BASE")
            .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string());

        Ok(Self::new(api_key).with_api_base(api_base))
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Gemini provider
///
/// Supports function calling plus the Google Search and code-execution
/// built-ins.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with an API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = request.model.clone();
        let body = build_request(&request);

        debug!(
            contents = body.contents.len(),
            tools = body.tools.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.api_base, model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                400 => LLMError::InvalidRequest(error_text),
                401 | 403 => LLMError::AuthenticationFailed,
                404 => LLMError::ModelNotFound(model),
                429 => LLMError::RateLimitExceeded(error_text),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let gemini_response: GenerateContentResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        parse_response(gemini_response)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// Gemini-specific request/response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    executable_code: Option<ExecutableCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code_execution_result: Option<CodeExecutionResult>,
}

impl GeminiPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    response: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExecutableCode {
    #[serde(default)]
    language: String,
    code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CodeExecutionResult {
    #[serde(default)]
    outcome: String,
    #[serde(default)]
    output: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    #[serde(skip_serializing_if = "Option::is_none")]
    function_declarations: Option<Vec<FunctionDeclaration>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    google_search: Option<EmptyObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_execution: Option<EmptyObject>,
}

#[derive(Debug, Serialize)]
struct EmptyObject {}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

fn build_request(request: &CompletionRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: build_contents(&request.messages),
        system_instruction: request.system.as_ref().map(|system| GeminiContent {
            role: None,
            parts: vec![GeminiPart::text(system.clone())],
        }),
        tools: build_tools(request.tools.as_deref(), &request.builtin_tools),
        generation_config: GenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
            stop_sequences: request.stop_sequences.clone(),
        },
    }
}

/// Convert the conversation into Gemini `contents`
///
/// Function responses must carry the function name, which our tool results
/// only reference by id; names are recovered from earlier tool uses.
fn build_contents(messages: &[Message]) -> Vec<GeminiContent> {
    let mut names_by_id: HashMap<String, String> = HashMap::new();
    let mut contents = Vec::with_capacity(messages.len());

    for message in messages {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "model",
        };

        let mut parts = Vec::new();
        for block in message.blocks() {
            match block {
                ContentBlock::Text { text } => parts.push(GeminiPart::text(text)),
                ContentBlock::ToolUse { id, name, input } => {
                    names_by_id.insert(id.clone(), name.clone());
                    parts.push(GeminiPart {
                        function_call: Some(FunctionCall {
                            id: remote_id(&id),
                            name,
                            args: input,
                        }),
                        ..GeminiPart::default()
                    });
                }
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    is_error,
                } => {
                    let name = names_by_id.get(&tool_use_id).cloned().unwrap_or_else(|| {
                        warn!(tool_use_id = %tool_use_id, "Tool result without matching tool use");
                        tool_use_id.clone()
                    });
                    parts.push(GeminiPart {
                        function_response: Some(FunctionResponse {
                            id: remote_id(&tool_use_id),
                            name,
                            response: response_object(&content, is_error.unwrap_or(false)),
                        }),
                        ..GeminiPart::default()
                    });
                }
            }
        }

        if !parts.is_empty() {
            contents.push(GeminiContent {
                role: Some(role.to_string()),
                parts,
            });
        }
    }

    contents
}

fn remote_id(id: &str) -> Option<String> {
    if id.starts_with(LOCAL_ID_PREFIX) {
        None
    } else {
        Some(id.to_string())
    }
}

/// Function responses must be JSON objects
fn response_object(content: &str, is_error: bool) -> Value {
    if is_error {
        return json!({ "error": content });
    }
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(other) => json!({ "result": other }),
        Err(_) => json!({ "result": content }),
    }
}

fn build_tools(tools: Option<&[ToolDefinition]>, builtins: &[BuiltinTool]) -> Vec<GeminiTool> {
    let mut gemini_tools = Vec::new();

    if let Some(tools) = tools.filter(|t| !t.is_empty()) {
        let declarations = tools
            .iter()
            .map(|tool| FunctionDeclaration {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: sanitize_schema(&tool.input_schema),
            })
            .collect();
        gemini_tools.push(GeminiTool {
            function_declarations: Some(declarations),
            ..GeminiTool::default()
        });
    }

    for builtin in builtins {
        gemini_tools.push(match builtin {
            BuiltinTool::GoogleSearch => GeminiTool {
                google_search: Some(EmptyObject {}),
                ..GeminiTool::default()
            },
            BuiltinTool::CodeExecution => GeminiTool {
                code_execution: Some(EmptyObject {}),
                ..GeminiTool::default()
            },
        });
    }

    gemini_tools
}

/// Strip keywords Gemini rejects; drop parameter-less object schemas entirely
fn sanitize_schema(schema: &Value) -> Option<Value> {
    let has_properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|p| !p.is_empty());
    if schema.get("type").and_then(Value::as_str) == Some("object") && !has_properties {
        return None;
    }
    Some(strip_unsupported(schema))
}

fn strip_unsupported(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !UNSUPPORTED_SCHEMA_KEYS.contains(&key.as_str()))
                .map(|(key, v)| (key.clone(), strip_unsupported(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_unsupported).collect()),
        other => other.clone(),
    }
}

fn parse_response(response: GenerateContentResponse) -> Result<CompletionResponse> {
    let usage = response.usage_metadata.unwrap_or_default();
    let usage = TokenUsage {
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
    };

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
            .unwrap_or("no candidates returned")
            .to_string();
        return Err(LLMError::UnexpectedResponse(format!(
            "Gemini returned no candidates: {reason}"
        )));
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let mut blocks = Vec::with_capacity(parts.len());

    for part in parts {
        if let Some(call) = part.function_call {
            let input = if call.args.is_null() { json!({}) } else { call.args };
            blocks.push(ContentBlock::ToolUse {
                id: call
                    .id
                    .unwrap_or_else(|| format!("{LOCAL_ID_PREFIX}{}", uuid::Uuid::new_v4())),
                name: call.name,
                input,
            });
        } else if let Some(code) = part.executable_code {
            blocks.push(ContentBlock::Text {
                text: format!("```{}\n{}\n```", code.language.to_lowercase(), code.code),
            });
        } else if let Some(result) = part.code_execution_result {
            blocks.push(ContentBlock::Text {
                text: format!(
                    "Output ({}):\n{}",
                    result.outcome,
                    result.output.unwrap_or_default()
                ),
            });
        } else if let Some(text) = part.text {
            if part.thought != Some(true) {
                blocks.push(ContentBlock::Text { text });
            }
        }
    }

    let finish_reason = candidate.finish_reason.unwrap_or_default();
    let has_tool_use = blocks
        .iter()
        .any(|b| matches!(b, ContentBlock::ToolUse { .. }));

    let stop_reason = if has_tool_use {
        StopReason::ToolUse
    } else {
        match finish_reason.as_str() {
            "MAX_TOKENS" => StopReason::MaxTokens,
            "STOP" | "" => StopReason::EndTurn,
            other => {
                debug!("Unmapped finish reason: {}", other);
                StopReason::EndTurn
            }
        }
    };

    debug!(
        ?stop_reason,
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        "Received Gemini response"
    );

    Ok(CompletionResponse {
        message: Message::assistant_blocks(blocks),
        stop_reason,
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.config().api_base, DEFAULT_GEMINI_API_BASE);
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let config = GeminiConfig::new("k").with_api_base("http://localhost:9000/v1beta/");
        assert_eq!(config.api_base, "http://localhost:9000/v1beta");
    }

    #[test]
    fn test_request_system_and_generation_config() {
        let request = CompletionRequest::builder("gemini-2.0-flash")
            .system("You're a specialist in Google Search")
            .add_message(Message::user("latest rust release?"))
            .max_tokens(512)
            .temperature(0.3)
            .build();

        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You're a specialist in Google Search"
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "latest rust release?");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_builtin_tools_serialization() {
        let tools = build_tools(None, &[BuiltinTool::GoogleSearch, BuiltinTool::CodeExecution]);
        let value = serde_json::to_value(&tools).unwrap();
        assert_eq!(value, json!([{"googleSearch": {}}, {"codeExecution": {}}]));
    }

    #[test]
    fn test_function_declarations() {
        let tools = vec![
            ToolDefinition::new(
                "get_weather",
                "Weather lookup",
                schema::object(json!({"city": schema::string("The name of city.")}), &["city"]),
            ),
            ToolDefinition::new(
                "ping",
                "No arguments",
                json!({"type": "object", "properties": {}}),
            ),
        ];
        let value = serde_json::to_value(build_tools(Some(tools.as_slice()), &[])).unwrap();
        let declarations = &value[0]["functionDeclarations"];
        assert_eq!(declarations[0]["name"], "get_weather");
        assert_eq!(declarations[0]["parameters"]["required"][0], "city");
        assert!(declarations[1].get("parameters").is_none());
    }

    #[test]
    fn test_sanitize_schema_strips_unsupported_keys() {
        let schema = json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "origin": {"type": "string"},
                "waypoints": {
                    "type": "array",
                    "items": {"type": "object", "additionalProperties": false, "properties": {"lat": {"type": "number"}}}
                }
            }
        });
        let cleaned = sanitize_schema(&schema).unwrap();
        assert!(cleaned.get("$schema").is_none());
        assert!(cleaned.get("additionalProperties").is_none());
        assert!(
            cleaned["properties"]["waypoints"]["items"]
                .get("additionalProperties")
                .is_none()
        );
        assert_eq!(cleaned["properties"]["origin"]["type"], "string");
    }

    #[test]
    fn test_function_response_recovers_name() {
        let messages = vec![
            Message::user("weather in Seoul?"),
            Message::assistant_blocks(vec![ContentBlock::ToolUse {
                id: "call-7".to_string(),
                name: "get_weather".to_string(),
                input: json!({"city": "Seoul"}),
            }]),
            Message::tool_results(vec![ContentBlock::tool_result(
                "call-7",
                r#"{"cod":200,"name":"Seoul"}"#,
            )]),
        ];

        let contents = serde_json::to_value(build_contents(&messages)).unwrap();
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["functionCall"]["name"], "get_weather");
        assert_eq!(contents[1]["parts"][0]["functionCall"]["id"], "call-7");

        let response = &contents[2]["parts"][0]["functionResponse"];
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(response["name"], "get_weather");
        assert_eq!(response["response"]["cod"], 200);
    }

    #[test]
    fn test_local_ids_not_sent() {
        let local = format!("{LOCAL_ID_PREFIX}abc");
        let messages = vec![Message::assistant_blocks(vec![ContentBlock::ToolUse {
            id: local,
            name: "SearchAgent".to_string(),
            input: json!({"request": "q"}),
        }])];
        let contents = serde_json::to_value(build_contents(&messages)).unwrap();
        assert!(contents[0]["parts"][0]["functionCall"].get("id").is_none());
    }

    #[test]
    fn test_response_object_wrapping() {
        assert_eq!(response_object(r#"{"a":1}"#, false), json!({"a": 1}));
        assert_eq!(response_object("\"sunny\"", false), json!({"result": "sunny"}));
        assert_eq!(response_object("plain text", false), json!({"result": "plain text"}));
        assert_eq!(response_object("Error: boom", true), json!({"error": "Error: boom"}));
    }

    #[test]
    fn test_parse_function_call_response() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "get_weather", "args": {"city": "Paris"}}}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5}
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let completion = parse_response(response).unwrap();

        assert_eq!(completion.stop_reason, StopReason::ToolUse);
        assert_eq!(completion.usage.total(), 17);
        match completion.message.tool_uses()[0] {
            ContentBlock::ToolUse { id, name, input } => {
                assert!(id.starts_with(LOCAL_ID_PREFIX));
                assert_eq!(name, "get_weather");
                assert_eq!(input["city"], "Paris");
            }
            _ => panic!("Expected tool use"),
        }
    }

    #[test]
    fn test_parse_code_execution_parts() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"executableCode": {"language": "PYTHON", "code": "print(sum(range(10)))"}},
                    {"codeExecutionResult": {"outcome": "OUTCOME_OK", "output": "45\n"}},
                    {"text": "The sum is 45."}
                ]},
                "finishReason": "STOP"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let completion = parse_response(response).unwrap();

        assert_eq!(completion.stop_reason, StopReason::EndTurn);
        let text = completion.message.text().unwrap();
        assert!(text.contains("```python\nprint(sum(range(10)))\n```"));
        assert!(text.contains("Output (OUTCOME_OK):\n45"));
        assert!(text.ends_with("The sum is 45."));
    }

    #[test]
    fn test_parse_max_tokens_and_thoughts() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "partial answer"}
                ]},
                "finishReason": "MAX_TOKENS"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let completion = parse_response(response).unwrap();
        assert_eq!(completion.stop_reason, StopReason::MaxTokens);
        assert_eq!(completion.message.text().as_deref(), Some("partial answer"));
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let raw = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let err = parse_response(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
