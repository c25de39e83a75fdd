//! Configuration for the OpenAI-compatible provider.

use secrecy::SecretString;

use sumchat_types::config::ChatConfig;

/// Default OpenAI API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Model identifier (e.g., "gpt-3.5-turbo").
    pub model: String,
}

/// Configuration taken from the user's config file.
///
/// Any base URL other than OpenAI's is reported as a generic
/// "openai_compatible" provider.
pub fn from_chat_config(config: &ChatConfig, api_key: SecretString) -> OpenAiCompatConfig {
    let base_url = config.base_url.trim_end_matches('/').to_string();
    let provider_name = if base_url == OPENAI_BASE_URL {
        "openai"
    } else {
        "openai_compatible"
    };

    OpenAiCompatConfig {
        provider_name: provider_name.into(),
        base_url,
        api_key,
        model: config.model.clone(),
    }
}
