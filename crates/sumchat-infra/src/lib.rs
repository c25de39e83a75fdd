//! Infrastructure layer for sumchat.
//!
//! Contains implementations of the ports defined in `sumchat-core`: the
//! OpenAI-compatible streaming provider and the local transcript store,
//! plus the TOML configuration loader.

pub mod config;
pub mod filesystem;
pub mod llm;
