//! Filesystem adapters for sumchat.
//!
//! Implements the `TranscriptStore` trait from `sumchat-core` on top of
//! `tokio::fs`. Transcripts land in `{home}/summary_go_chats/`.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use sumchat_core::chat::store::TranscriptStore;
use sumchat_types::error::PersistError;

/// Directory under the home directory holding saved transcripts.
pub const TRANSCRIPT_DIR: &str = "summary_go_chats";

/// Local filesystem implementation of the `TranscriptStore` trait.
#[derive(Debug, Clone, Default)]
pub struct LocalTranscriptStore {
    /// Fixed target directory. `None` resolves `{home}/summary_go_chats` on each save.
    root: Option<PathBuf>,
}

impl LocalTranscriptStore {
    /// Store transcripts under the current user's home directory.
    pub fn in_home() -> Self {
        Self { root: None }
    }

    /// Store transcripts in `dir`.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(dir.into()),
        }
    }

    fn transcript_dir(&self) -> Result<PathBuf, PersistError> {
        match &self.root {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(TRANSCRIPT_DIR))
                .ok_or(PersistError::HomeDirUnavailable),
        }
    }
}

async fn write_new_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await
}

impl TranscriptStore for LocalTranscriptStore {
    async fn save(&self, file_name: &str, contents: &str) -> Result<PathBuf, PersistError> {
        let dir = self.transcript_dir()?;

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        let path = dir.join(file_name);
        write_new_file(&path, contents)
            .await
            .map_err(|source| PersistError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "Transcript written");
        Ok(path)
    }
}
