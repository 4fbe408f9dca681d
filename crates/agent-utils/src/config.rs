//! Environment configuration helpers
//!
//! API keys are read from the environment. These helpers take a lookup
//! function so callers can resolve against something other than the real
//! process environment (tests, config files).

use tracing::warn;

/// Look up `key`, treating an empty value the same as an unset one
pub fn non_empty_env<F>(lookup: F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Look up `key`, falling back to `placeholder` with a warning when unset
///
/// The placeholder lets dependent processes start; the upstream service is
/// expected to reject it.
pub fn env_or_placeholder<F>(lookup: F, key: &str, placeholder: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty_env(lookup, key).unwrap_or_else(|| {
        warn!(
            env_var = key,
            "{key} is not set. Please set it as an environment variable; using a placeholder"
        );
        placeholder.to_string()
    })
}
