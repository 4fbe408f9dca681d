//! Shared utilities for the multi-agent assistant
//!
//! This crate provides logging setup and environment-variable helpers used
//! across the workspace.

pub mod config;
pub mod logging;

pub use config::{env_or_placeholder, non_empty_env};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
