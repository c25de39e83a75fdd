//! Shared domain types for sumchat.
//!
//! Messages, streaming events, configuration values, and the error types
//! that cross crate boundaries.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod llm;
