//! Business logic and port definitions for sumchat.
//!
//! This crate owns the chat session state machine and defines the "ports"
//! (provider, console, transcript store) that the infrastructure and CLI
//! layers implement. It depends only on `sumchat-types` -- never on
//! `sumchat-infra` or any network/IO crate.

pub mod chat;
pub mod llm;
