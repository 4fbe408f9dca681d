//! Core abstractions for the multi-agent assistant
//!
//! This crate defines the `Agent` trait, the invocation `Context` and the
//! shared error type used throughout the workspace.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
