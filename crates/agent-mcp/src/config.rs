//! Configuration types for MCP integration
//!
//! Servers are described in `.mcp.json`-style files and can be assigned to
//! agents by name, each with its own tool allow/deny list.

use crate::Result;
use crate::error::MCPError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root MCP configuration
///
/// # Example
///
/// ```json
/// {
///   "mcpServers": {
///     "google-maps": {
///       "transport": "stdio",
///       "command": "npx",
///       "args": ["-y", "@modelcontextprotocol/server-google-maps"],
///       "env": {"GOOGLE_MAPS_API_KEY": "${GOOGLE_MAPS_API_KEY}"}
///     }
///   },
///   "agentConfigurations": {
///     "MapsAgent": {
///       "mcpServers": ["google-maps"],
///       "tools": {"allow": "*", "deny": ["maps_elevation"]}
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MCPConfig {
    /// MCP server definitions
    #[serde(default)]
    pub mcp_servers: HashMap<String, MCPServerConfig>,

    /// Per-agent configurations
    #[serde(default)]
    pub agent_configurations: HashMap<String, AgentMCPConfig>,
}

/// How to launch an MCP server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum MCPServerConfig {
    /// Local subprocess speaking JSON-RPC over stdin/stdout
    Stdio {
        /// Command to execute
        command: String,

        /// Command arguments
        #[serde(default)]
        args: Vec<String>,

        /// Environment variables added to the child's environment
        #[serde(default)]
        env: HashMap<String, String>,

        /// Working directory (optional)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cwd: Option<PathBuf>,

        /// Seconds to wait for each response, the handshake included
        /// (defaults to [`DEFAULT_REQUEST_TIMEOUT_SECS`])
        #[serde(
            default,
            rename = "timeoutSecs",
            skip_serializing_if = "Option::is_none"
        )]
        timeout_secs: Option<u64>,
    },
}

/// Response timeout when a server config sets none
///
/// Covers the first `npx -y` run, which downloads the package before the
/// server can answer `initialize`.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

impl MCPServerConfig {
    /// Stdio server with no working directory override
    pub fn stdio(
        command: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        env: HashMap<String, String>,
    ) -> Self {
        Self::Stdio {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            env,
            cwd: None,
            timeout_secs: None,
        }
    }

    /// Set the response timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        let Self::Stdio { timeout_secs, .. } = &mut self;
        *timeout_secs = Some(secs);
        self
    }

    /// Response timeout in effect
    pub fn timeout(&self) -> Duration {
        let Self::Stdio { timeout_secs, .. } = self;
        Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }
}

/// Per-agent MCP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMCPConfig {
    /// MCP servers this agent can use (references keys in mcp_servers)
    pub mcp_servers: Vec<String>,

    /// Tool filtering configuration
    #[serde(default)]
    pub tools: ToolFilter,
}

/// Tool filtering configuration
///
/// The deny list wins over the allow list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFilter {
    /// Allowed tools ("*" for all, or list of tool names)
    #[serde(default = "default_allow_all")]
    pub allow: ToolPattern,

    /// Denied tools
    #[serde(default)]
    pub deny: Vec<String>,
}

impl Default for ToolFilter {
    fn default() -> Self {
        Self {
            allow: default_allow_all(),
            deny: Vec::new(),
        }
    }
}

impl ToolFilter {
    /// Allow only the named tools
    pub fn only(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allow: ToolPattern::List(names.into_iter().map(Into::into).collect()),
            deny: Vec::new(),
        }
    }

    /// Check if a tool passes this filter
    pub fn allows(&self, tool_name: &str) -> bool {
        if self.deny.iter().any(|d| d == tool_name) {
            return false;
        }
        match &self.allow {
            ToolPattern::All(pattern) => pattern == "*",
            ToolPattern::List(allowed) => allowed.iter().any(|a| a == tool_name),
        }
    }
}

/// Which tool names a filter matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolPattern {
    /// Allow all tools (must be "*")
    All(String),

    /// Allow specific tools by name
    List(Vec<String>),
}

fn default_allow_all() -> ToolPattern {
    ToolPattern::All("*".to_string())
}

impl MCPConfig {
    /// Load configuration from a file and expand environment references
    ///
    /// ```no_run
    /// # use agent_mcp::config::MCPConfig;
    /// let config = MCPConfig::from_file(".mcp.json")?;
    /// # Ok::<(), agent_mcp::error::MCPError>(())
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with(path, |name| std::env::var(name).ok())
    }

    /// Load configuration from a file, expanding references with `lookup`
    ///
    /// Expansion happens once; expanded values are never expanded again.
    pub fn from_file_with<F>(path: impl AsRef<Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MCPError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;

        let mut config: MCPConfig = serde_json::from_str(&content).map_err(|e| {
            MCPError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        config.resolve_env_vars_with(lookup)?;
        Ok(config)
    }

    /// Merge another config into this one
    ///
    /// The `other` config's entries take precedence.
    pub fn merge(&mut self, other: MCPConfig) {
        self.mcp_servers.extend(other.mcp_servers);
        self.agent_configurations.extend(other.agent_configurations);
    }

    /// Get configuration for a specific agent
    ///
    /// Falls back to the "default" entry when the agent has none.
    pub fn get_agent_config(&self, agent_name: &str) -> Option<&AgentMCPConfig> {
        self.agent_configurations
            .get(agent_name)
            .or_else(|| self.agent_configurations.get("default"))
    }

    /// Expand `${VAR}` and `$VAR` references from the process environment
    pub fn resolve_env_vars(&mut self) -> Result<()> {
        self.resolve_env_vars_with(|name| std::env::var(name).ok())
    }

    /// Expand environment references using `lookup`
    pub fn resolve_env_vars_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for server_config in self.mcp_servers.values_mut() {
            let MCPServerConfig::Stdio {
                command,
                args,
                env,
                cwd,
                ..
            } = server_config;

            *command = resolve_env_string_with(command, &lookup)?;
            for arg in args.iter_mut() {
                *arg = resolve_env_string_with(arg, &lookup)?;
            }
            for value in env.values_mut() {
                *value = resolve_env_string_with(value, &lookup)?;
            }
            if let Some(path) = cwd {
                let resolved = resolve_env_string_with(&path.to_string_lossy(), &lookup)?;
                *path = PathBuf::from(resolved);
            }
        }

        Ok(())
    }
}

/// Resolve environment variable references in a string
///
/// Supports `${VAR}` and `$VAR` syntax; a missing variable is an error.
pub fn resolve_env_string(s: &str) -> Result<String> {
    resolve_env_string_with(s, |name| std::env::var(name).ok())
}

/// Resolve variable references in a string using `lookup`
///
/// ```
/// # use agent_mcp::config::resolve_env_string_with;
/// let lookup = |name: &str| (name == "MAPS_KEY").then(|| "abc".to_string());
/// let result = resolve_env_string_with("key=${MAPS_KEY};again=$MAPS_KEY", lookup)?;
/// assert_eq!(result, "key=abc;again=abc");
/// # Ok::<(), agent_mcp::error::MCPError>(())
/// ```
pub fn resolve_env_string_with<F>(s: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .map_err(|e| MCPError::InvalidPattern(e.to_string()))?;

    let mut resolved = String::with_capacity(s.len());
    let mut last = 0;
    for cap in pattern.captures_iter(s) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1).or_else(|| cap.get(2))) else {
            continue;
        };
        let value = lookup(name.as_str())
            .ok_or_else(|| MCPError::EnvVarNotFound(name.as_str().to_string()))?;

        resolved.push_str(&s[last..whole.start()]);
        resolved.push_str(&value);
        last = whole.end();
    }
    resolved.push_str(&s[last..]);

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(name: &str) -> Option<String> {
        match name {
            "MAPS_KEY" => Some("maps-123".to_string()),
            "HOME_DIR" => Some("/home/dev".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_config_parsing_stdio() {
        let json = r#"{
            "mcpServers": {
                "google-maps": {
                    "transport": "stdio",
                    "command": "npx",
                    "args": ["-y", "@modelcontextprotocol/server-google-maps"]
                }
            }
        }"#;

        let config: MCPConfig = serde_json::from_str(json).unwrap();
        let server = &config.mcp_servers["google-maps"];
        let MCPServerConfig::Stdio {
            command,
            args,
            env,
            cwd,
            timeout_secs,
        } = server;
        assert_eq!(command, "npx");
        assert_eq!(args[1], "@modelcontextprotocol/server-google-maps");
        assert!(env.is_empty());
        assert!(cwd.is_none());
        assert!(timeout_secs.is_none());
        assert_eq!(server.timeout(), Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn test_unknown_transport_rejected() {
        let json = r#"{"mcpServers": {"x": {"transport": "http", "url": "http://localhost"}}}"#;
        assert!(serde_json::from_str::<MCPConfig>(json).is_err());
    }

    #[test]
    fn test_env_resolution() {
        assert_eq!(
            resolve_env_string_with("${MAPS_KEY}", vars).unwrap(),
            "maps-123"
        );
        assert_eq!(
            resolve_env_string_with("$HOME_DIR/bin:${MAPS_KEY}", vars).unwrap(),
            "/home/dev/bin:maps-123"
        );
        assert_eq!(
            resolve_env_string_with("no references", vars).unwrap(),
            "no references"
        );

        let err = resolve_env_string_with("${MISSING}", vars).unwrap_err();
        assert!(matches!(err, MCPError::EnvVarNotFound(ref v) if v == "MISSING"));
    }

    #[test]
    fn test_resolve_config_values() {
        let mut config = MCPConfig::default();
        config.mcp_servers.insert(
            "maps".to_string(),
            MCPServerConfig::Stdio {
                command: "npx".to_string(),
                args: vec!["-y".to_string()],
                env: HashMap::from([(
                    "GOOGLE_MAPS_API_KEY".to_string(),
                    "${MAPS_KEY}".to_string(),
                )]),
                cwd: Some(PathBuf::from("$HOME_DIR")),
                timeout_secs: Some(30),
            },
        );

        config.resolve_env_vars_with(vars).unwrap();

        let MCPServerConfig::Stdio { env, cwd, .. } = &config.mcp_servers["maps"];
        assert_eq!(env["GOOGLE_MAPS_API_KEY"], "maps-123");
        assert_eq!(cwd.as_deref(), Some(Path::new("/home/dev")));
    }

    #[test]
    fn test_tool_filtering() {
        let filter = ToolFilter {
            allow: ToolPattern::List(vec![
                "maps_geocode".to_string(),
                "maps_directions".to_string(),
            ]),
            deny: vec!["maps_directions".to_string()],
        };

        assert!(filter.allows("maps_geocode"));
        assert!(!filter.allows("maps_directions"));
        assert!(!filter.allows("maps_elevation"));

        let all = ToolFilter::default();
        assert!(all.allows("anything"));

        let only = ToolFilter::only(["maps_search_places"]);
        assert!(only.allows("maps_search_places"));
        assert!(!only.allows("maps_geocode"));
    }

    #[test]
    fn test_filter_deserialization() {
        let filter: ToolFilter =
            serde_json::from_str(r#"{"allow": ["a", "b"], "deny": ["b"]}"#).unwrap();
        assert!(filter.allows("a"));
        assert!(!filter.allows("b"));

        let filter: ToolFilter = serde_json::from_str(r#"{"deny": ["x"]}"#).unwrap();
        assert!(filter.allows("y"));
        assert!(!filter.allows("x"));
    }

    #[test]
    fn test_config_merge_prefers_other() {
        let mut base = MCPConfig::default();
        base.mcp_servers.insert(
            "maps".to_string(),
            MCPServerConfig::stdio("old", Vec::<String>::new(), HashMap::new()),
        );

        let mut other = MCPConfig::default();
        other.mcp_servers.insert(
            "maps".to_string(),
            MCPServerConfig::stdio("new", Vec::<String>::new(), HashMap::new()),
        );
        other.mcp_servers.insert(
            "fs".to_string(),
            MCPServerConfig::stdio("fs-server", ["/tmp"], HashMap::new()),
        );

        base.merge(other);
        assert_eq!(base.mcp_servers.len(), 2);
        let MCPServerConfig::Stdio { command, .. } = &base.mcp_servers["maps"];
        assert_eq!(command, "new");
    }

    #[test]
    fn test_get_agent_config_falls_back_to_default() {
        let mut config = MCPConfig::default();
        config.agent_configurations.insert(
            "MapsAgent".to_string(),
            AgentMCPConfig {
                mcp_servers: vec!["maps".to_string()],
                tools: ToolFilter::default(),
            },
        );
        config.agent_configurations.insert(
            "default".to_string(),
            AgentMCPConfig {
                mcp_servers: vec!["fs".to_string()],
                tools: ToolFilter::default(),
            },
        );

        assert_eq!(config.get_agent_config("MapsAgent").unwrap().mcp_servers[0], "maps");
        assert_eq!(config.get_agent_config("CodeAgent").unwrap().mcp_servers[0], "fs");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "mcpServers": {{
                    "maps": {{"transport": "stdio", "command": "npx", "args": ["-y", "pkg"]}}
                }},
                "agentConfigurations": {{
                    "MapsAgent": {{"mcpServers": ["maps"], "tools": {{"allow": ["maps_geocode"]}}}}
                }}
            }}"#
        )
        .unwrap();

        let config = MCPConfig::from_file(file.path()).unwrap();
        assert!(config.mcp_servers.contains_key("maps"));
        let agent = config.get_agent_config("MapsAgent").unwrap();
        assert!(agent.tools.allows("maps_geocode"));
        assert!(!agent.tools.allows("maps_elevation"));
    }

    #[test]
    fn test_from_file_expands_values_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "mcpServers": {{
                    "maps": {{
                        "transport": "stdio",
                        "command": "npx",
                        "env": {{"GOOGLE_MAPS_API_KEY": "${{MAPS_KEY}}"}},
                        "timeoutSecs": 5
                    }}
                }}
            }}"#
        )
        .unwrap();

        let lookup = |name: &str| (name == "MAPS_KEY").then(|| "abc$NOT_A_VAR".to_string());
        let config = MCPConfig::from_file_with(file.path(), lookup).unwrap();

        let server = &config.mcp_servers["maps"];
        let MCPServerConfig::Stdio { env, .. } = server;
        assert_eq!(env["GOOGLE_MAPS_API_KEY"], "abc$NOT_A_VAR");
        assert_eq!(server.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_with_timeout() {
        let server = MCPServerConfig::stdio("npx", ["-y", "pkg"], HashMap::new()).with_timeout(7);
        assert_eq!(server.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_from_file_missing() {
        let err = MCPConfig::from_file("/nonexistent/.mcp.json").unwrap_err();
        assert!(matches!(err, MCPError::ConfigError(_)));
    }
}
