//! Configuration types for sumchat.
//!
//! `ChatConfig` is the on-disk `~/.sumchat.toml`. `SessionConfig` is the
//! slice of it a chat session needs, built once and handed to the session
//! constructor.

use serde::{Deserialize, Serialize};

/// Top-level configuration file contents.
///
/// All fields except the API key have defaults, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// API key for the chat completions endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_key: Option<String>,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// System message placed at the head of every conversation.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            openai_key: None,
            model: default_model(),
            system_prompt: default_system_prompt(),
            base_url: default_base_url(),
        }
    }
}

impl ChatConfig {
    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Session settings derived from this config.
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
        }
    }
}

/// Settings fixed for the lifetime of one chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub model: String,
    pub system_prompt: String,
}
