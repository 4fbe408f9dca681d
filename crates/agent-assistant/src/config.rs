//! Configuration for the assistant
//!
//! Everything comes from environment variables. [`AssistantConfig::from_lookup`]
//! takes the lookup as a function so tests never touch the process environment.

use agent_utils::{env_or_placeholder, non_empty_env};

/// Default model for the root and search agents
pub const DEFAULT_ROOT_MODEL: &str = "gemini-2.5-pro-preview-05-06";

/// Default model for the code and maps agents
pub const DEFAULT_SPECIALIST_MODEL: &str = "gemini-2.0-flash";

/// Sent to the maps server when `GOOGLE_MAPS_API_KEY` is unset
pub const MAPS_API_KEY_PLACEHOLDER: &str = "YOUR_GOOGLE_MAPS_API_KEY_HERE";

/// Resolved assistant configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// OpenWeather key; empty when unset
    pub openweather_api_key: String,

    /// Key injected into the maps server's environment
    pub google_maps_api_key: String,

    /// Model of `RootAgent` and `SearchAgent`
    pub root_model: String,

    /// Model of `CodeAgent` and `MapsAgent`
    pub specialist_model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            openweather_api_key: String::new(),
            google_maps_api_key: MAPS_API_KEY_PLACEHOLDER.to_string(),
            root_model: DEFAULT_ROOT_MODEL.to_string(),
            specialist_model: DEFAULT_SPECIALIST_MODEL.to_string(),
        }
    }
}

impl AssistantConfig {
    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to read variables
    ///
    /// A missing maps key is replaced by [`MAPS_API_KEY_PLACEHOLDER`] and
    /// logged as a warning. A missing weather key stays empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            openweather_api_key: lookup("OPENWEATHER_API_KEY").unwrap_or_default(),
            google_maps_api_key: env_or_placeholder(
                &lookup,
                "GOOGLE_MAPS_API_KEY",
                MAPS_API_KEY_PLACEHOLDER,
            ),
            root_model: non_empty_env(&lookup, "ROOT_AGENT_MODEL")
                .unwrap_or_else(|| DEFAULT_ROOT_MODEL.to_string()),
            specialist_model: non_empty_env(&lookup, "SPECIALIST_MODEL")
                .unwrap_or_else(|| DEFAULT_SPECIALIST_MODEL.to_string()),
        }
    }
}
