//! Configuration loader for sumchat.
//!
//! Reads `~/.sumchat.toml` (or an explicit path) into [`ChatConfig`]. A
//! missing file yields the defaults; a malformed one is an error so that a
//! later write-back never clobbers a file the user was editing.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use thiserror::Error;

use sumchat_types::config::ChatConfig;

/// File name of the config file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".sumchat.toml";

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve the home directory")]
    HomeDirUnavailable,

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

/// `{home}/.sumchat.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::HomeDirUnavailable)
}

/// Load the configuration at `path`.
///
/// - If the file does not exist, returns [`ChatConfig::default()`].
/// - If it cannot be read or parsed, returns the error.
pub async fn load_config(path: &Path) -> Result<ChatConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return Ok(ChatConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `config` to `path`, creating parent directories as needed.
pub async fn save_config(path: &Path, config: &ChatConfig) -> Result<(), ConfigError> {
    let write_err = |message: String| ConfigError::Write {
        path: path.to_path_buf(),
        message,
    };

    let content = toml::to_string(config).map_err(|e| write_err(e.to_string()))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| write_err(e.to_string()))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| write_err(e.to_string()))?;

    tracing::debug!("Saved config to {}", path.display());
    Ok(())
}

/// Resolve the API key: `OPENAI_API_KEY` first, then the config file.
pub fn resolve_api_key(config: &ChatConfig) -> Option<SecretString> {
    pick_api_key(std::env::var(API_KEY_ENV).ok(), config)
}

fn pick_api_key(env_value: Option<String>, config: &ChatConfig) -> Option<SecretString> {
    env_value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| config.api_key().map(str::to_string))
        .map(SecretString::from)
}
