//! LLM provider abstractions for sumchat.
//!
//! - `LlmProvider`: trait for concrete streaming provider implementations
//! - `StreamInSpan`: keeps a tracing span entered while a reply streams

pub mod provider;
pub mod span;
