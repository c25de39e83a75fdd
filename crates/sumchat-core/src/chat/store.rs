//! TranscriptStore trait for abstracting transcript persistence.
//!
//! Defined in sumchat-core so the session can save transcripts without
//! depending on the real filesystem. The local adapter lives in
//! sumchat-infra.

use std::future::Future;
use std::path::PathBuf;

use sumchat_types::error::PersistError;

pub trait TranscriptStore: Send + Sync {
    /// Write `contents` as a new file named `file_name` and return its path.
    ///
    /// Must never overwrite or append to an existing file.
    fn save(
        &self,
        file_name: &str,
        contents: &str,
    ) -> impl Future<Output = Result<PathBuf, PersistError>> + Send;
}
