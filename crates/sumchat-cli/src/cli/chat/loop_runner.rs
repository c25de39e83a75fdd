//! Chat session bootstrap.
//!
//! Loads the config, makes sure an API key is available (prompting for one
//! and saving it if not), builds the provider and terminal console, then hands
//! control to `ChatSession::run`.

use std::path::Path;

use anyhow::Context;
use console::style;
use dialoguer::Password;
use secrecy::SecretString;
use tracing::info;

use sumchat_core::chat::session::ChatSession;
use sumchat_core::llm::provider::LlmProvider;
use sumchat_infra::config::{default_config_path, load_config, resolve_api_key, save_config};
use sumchat_infra::filesystem::LocalTranscriptStore;
use sumchat_infra::llm::openai_compat::OpenAiCompatibleProvider;
use sumchat_infra::llm::openai_compat::config::from_chat_config;
use sumchat_types::config::ChatConfig;

use super::banner::print_welcome_banner;
use super::input::ChatInput;
use super::renderer::ConsoleRenderer;

/// Run an interactive chat session until the user exits.
pub async fn run_chat_loop(
    config_path: Option<&Path>,
    model_override: Option<String>,
) -> anyhow::Result<()> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };
    let mut config = load_config(&config_path).await?;

    let api_key = match resolve_api_key(&config) {
        Some(key) => key,
        None => prompt_and_store_key(&mut config, &config_path).await?,
    };

    if let Some(model) = model_override {
        config.model = model;
    }

    let provider = OpenAiCompatibleProvider::new(from_chat_config(&config, api_key));
    print_welcome_banner(provider.name(), provider.model());

    let console = ConsoleRenderer::new(ChatInput::detect());
    let store = LocalTranscriptStore::in_home();
    let mut session = ChatSession::new(config.session(), provider, console, store);

    let summary = session.run().await;
    info!(
        turns = summary.turns,
        saved = summary.saved.len(),
        "Chat loop finished"
    );

    Ok(())
}

/// Ask for an API key and write it back to the config file.
async fn prompt_and_store_key(
    config: &mut ChatConfig,
    config_path: &Path,
) -> anyhow::Result<SecretString> {
    println!(
        "  {} No API key found in {} or $OPENAI_API_KEY.",
        style("!").yellow().bold(),
        style(config_path.display()).cyan()
    );

    let entered: String = Password::new()
        .with_prompt("Enter your OpenAI API key")
        .interact()
        .context("failed to read the API key")?;
    let entered = entered.trim().to_string();
    if entered.is_empty() {
        anyhow::bail!("an API key is required to start a chat session");
    }

    config.openai_key = Some(entered.clone());
    save_config(config_path, config).await?;
    println!(
        "  {} API key saved to {}",
        style("✓").green().bold(),
        style(config_path.display()).cyan()
    );

    Ok(SecretString::from(entered))
}
