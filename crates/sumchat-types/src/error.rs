use std::path::PathBuf;

use thiserror::Error;

/// Errors from writing a transcript to storage.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not resolve the home directory")]
    HomeDirUnavailable,

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
