//! Stdio transport MCP client
//!
//! Spawns the MCP server as a child process and speaks newline-delimited
//! JSON-RPC 2.0 over its stdin/stdout. Requests are serialized through one
//! lock, so each response is read by the request that sent it. Anything on
//! stdout that is not the awaited response (notifications, server requests,
//! log lines) is skipped. A server that does not answer within the request
//! timeout is killed.

use super::{MCPClient, MCPServerInfo, MCPToolDefinition, MCPToolResult};
use crate::Result;
use crate::config::{DEFAULT_REQUEST_TIMEOUT_SECS, MCPServerConfig};
use crate::error::MCPError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// Protocol revision sent in `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Handles of a running server process
struct Connection {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Connection {
    async fn write_message(&mut self, message: &Value) -> Result<()> {
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| MCPError::ConnectionFailed(e.to_string()))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| MCPError::ConnectionFailed(e.to_string()))
    }

    /// Read lines until the response carrying `id` arrives
    async fn read_response(&mut self, id: u64) -> Result<Value> {
        loop {
            let mut line = String::new();
            let read = self
                .stdout
                .read_line(&mut line)
                .await
                .map_err(|e| MCPError::ConnectionFailed(e.to_string()))?;
            if read == 0 {
                return Err(MCPError::ConnectionFailed(
                    "Server closed connection".to_string(),
                ));
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Ok(message) = serde_json::from_str::<Value>(line) else {
                trace!(line, "Skipping non-JSON output from MCP server");
                continue;
            };

            if is_response_to(&message, id) {
                return Ok(message);
            }
            trace!(expected = id, "Skipping unrelated MCP message");
        }
    }
}

/// A response carries our id and no `method`; server requests carry both
fn is_response_to(message: &Value, id: u64) -> bool {
    message.get("method").is_none() && message.get("id").and_then(Value::as_u64) == Some(id)
}

/// MCP client using stdio transport
pub struct StdioMCPClient {
    command: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
    request_timeout: Duration,

    connection: Mutex<Option<Connection>>,
    server_info: Mutex<Option<MCPServerInfo>>,
    connected: AtomicBool,
    request_id: AtomicU64,
}

impl StdioMCPClient {
    /// Create a new stdio MCP client
    ///
    /// # Arguments
    ///
    /// * `command` - Command to execute
    /// * `args` - Command arguments
    /// * `env` - Extra environment variables for the child
    /// * `cwd` - Working directory (optional)
    pub fn new(
        command: impl Into<String>,
        args: Vec<String>,
        env: HashMap<String, String>,
        cwd: Option<PathBuf>,
    ) -> Self {
        Self {
            command: command.into(),
            args,
            env,
            cwd,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connection: Mutex::new(None),
            server_info: Mutex::new(None),
            connected: AtomicBool::new(false),
            request_id: AtomicU64::new(0),
        }
    }

    /// Create from MCPServerConfig
    pub fn from_config(config: &MCPServerConfig) -> Self {
        let MCPServerConfig::Stdio {
            command,
            args,
            env,
            cwd,
            ..
        } = config;
        Self::new(command.clone(), args.clone(), env.clone(), cwd.clone())
            .with_request_timeout(config.timeout())
    }

    /// How long to wait for each response, the handshake included
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Send a JSON-RPC request and wait for its result
    async fn send_request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst) + 1;
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });

        let mut guard = self.connection.lock().await;
        let connection = guard.as_mut().ok_or(MCPError::NotConnected)?;

        debug!(method, id, "Sending MCP request");
        let exchange = async move {
            connection.write_message(&request).await?;
            connection.read_response(id).await
        };
        let outcome = tokio::time::timeout(self.request_timeout, exchange).await;
        let Ok(response) = outcome else {
            warn!(
                command = %self.command,
                method,
                timeout_secs = self.request_timeout.as_secs(),
                "MCP server did not respond in time, killing it"
            );
            if let Some(mut connection) = guard.take() {
                if let Err(e) = connection.child.start_kill() {
                    warn!(command = %self.command, "Failed to kill MCP server: {}", e);
                }
            }
            self.connected.store(false, Ordering::SeqCst);
            return Err(MCPError::ConnectionFailed(format!(
                "{method}: no response within {}s",
                self.request_timeout.as_secs()
            )));
        };
        let response = response?;

        if let Some(error) = response.get("error") {
            return Err(MCPError::RequestFailed(format!("{method}: {error}")));
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| MCPError::RequestFailed(format!("{method}: no result in response")))
    }

    async fn send_notification(&self, method: &str) -> Result<()> {
        let mut guard = self.connection.lock().await;
        let connection = guard.as_mut().ok_or(MCPError::NotConnected)?;
        connection
            .write_message(&json!({"jsonrpc": "2.0", "method": method}))
            .await
    }

    /// Run the initialize handshake
    async fn initialize(&self) -> Result<MCPServerInfo> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }
        });

        let result = self
            .send_request("initialize", params)
            .await
            .map_err(|e| match e {
                MCPError::ConnectionFailed(_) => e,
                other => MCPError::InitializationFailed(other.to_string()),
            })?;

        let text = |value: &Value, default: &str| {
            value.as_str().unwrap_or(default).to_string()
        };
        let server_info = MCPServerInfo {
            name: text(&result["serverInfo"]["name"], "unknown"),
            version: text(&result["serverInfo"]["version"], "unknown"),
            protocol_version: text(&result["protocolVersion"], PROTOCOL_VERSION),
            capabilities: result.get("capabilities").cloned().unwrap_or(Value::Null),
        };

        self.send_notification("notifications/initialized").await?;

        info!(
            server = %server_info.name,
            version = %server_info.version,
            "Connected to MCP server"
        );
        Ok(server_info)
    }

    fn spawn(&self) -> Result<Connection> {
        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        let mut child = command.spawn().map_err(|e| {
            MCPError::ConnectionFailed(format!("Failed to spawn '{}': {e}", self.command))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MCPError::ConnectionFailed("Failed to get stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MCPError::ConnectionFailed("Failed to get stdout".to_string()))?;

        Ok(Connection {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    async fn kill(&self) {
        if let Some(mut connection) = self.connection.lock().await.take() {
            if let Err(e) = connection.child.kill().await {
                warn!(command = %self.command, "Failed to kill MCP server: {}", e);
            }
        }
    }
}

#[async_trait]
impl MCPClient for StdioMCPClient {
    async fn connect(&self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        debug!(command = %self.command, args = ?self.args, "Starting MCP server");
        *self.connection.lock().await = Some(self.spawn()?);

        match self.initialize().await {
            Ok(info) => {
                *self.server_info.lock().await = Some(info);
                self.connected.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                self.kill().await;
                Err(e)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn disconnect(&self) -> Result<()> {
        debug!(command = %self.command, "Disconnecting from MCP server");
        self.connected.store(false, Ordering::SeqCst);
        self.kill().await;
        Ok(())
    }

    async fn list_tools(&self) -> Result<Vec<MCPToolDefinition>> {
        if !self.is_connected() {
            return Err(MCPError::NotConnected);
        }

        let result = self.send_request("tools/list", json!({})).await?;
        let tools = result.get("tools").cloned().unwrap_or_else(|| json!([]));

        serde_json::from_value(tools)
            .map_err(|e| MCPError::RequestFailed(format!("Failed to parse tools: {e}")))
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<MCPToolResult> {
        if !self.is_connected() {
            return Err(MCPError::NotConnected);
        }

        let params = json!({
            "name": name,
            "arguments": arguments
        });
        let result = self.send_request("tools/call", params).await?;

        serde_json::from_value(result)
            .map_err(|e| MCPError::ToolCallFailed(format!("Failed to parse result: {e}")))
    }

    async fn server_info(&self) -> Option<MCPServerInfo> {
        self.server_info.lock().await.clone()
    }
}

impl Drop for StdioMCPClient {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.get_mut() {
            let _ = connection.child.start_kill();
        }
    }
}
