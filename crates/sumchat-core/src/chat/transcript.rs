//! Transcript accumulation and persistence.
//!
//! Every completed turn is appended to a single text buffer in a fixed
//! format:
//!
//! ```text
//! You:
//!  <input>
//!
//! Assistant:
//!  <response>
//!
//!
//! ```
//!
//! `persist` asks the user for confirmation and hands the whole buffer to a
//! [`TranscriptStore`] under a timestamped file name. The buffer is kept
//! after saving, so a later save contains everything again. When the name for
//! the current second is already taken, the next second is tried.

use std::path::PathBuf;

use chrono::{DateTime, Local, TimeDelta};
use tracing::debug;

use sumchat_types::error::PersistError;

use super::console::{ChatConsole, InputEvent};
use super::store::TranscriptStore;

/// Question asked before writing a transcript.
pub const SAVE_PROMPT: &str = "Save this chat transcript? [Y/n] ";

const FILE_PREFIX: &str = "summary_go_chat_";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// File names tried per save before giving up.
const MAX_NAME_ATTEMPTS: u32 = 10;

/// Who said a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    You,
    Assistant,
}

/// How a persist request ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved(PathBuf),
    Declined,
}

/// In-memory transcript for one session.
#[derive(Debug, Clone, Default)]
pub struct TranscriptRecorder {
    buffer: String,
}

impl TranscriptRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one formatted entry.
    pub fn append(&mut self, speaker: Speaker, text: &str) {
        match speaker {
            Speaker::You => {
                self.buffer.push_str("You:\n ");
                self.buffer.push_str(text);
                self.buffer.push_str("\n\n");
            }
            Speaker::Assistant => {
                self.buffer.push_str("Assistant:\n ");
                self.buffer.push_str(text);
                self.buffer.push_str("\n\n\n");
            }
        }
    }

    /// Append a full user/assistant turn.
    pub fn record_turn(&mut self, input: &str, reply: &str) {
        self.append(Speaker::You, input);
        self.append(Speaker::Assistant, reply);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Ask for confirmation and, if given, write the buffer to `store`.
    pub async fn persist<C, S>(
        &self,
        console: &mut C,
        store: &S,
        now: DateTime<Local>,
    ) -> Result<PersistOutcome, PersistError>
    where
        C: ChatConsole,
        S: TranscriptStore,
    {
        let accepted = match console.read_line(SAVE_PROMPT).await {
            InputEvent::Line(answer) => accepts_confirmation(&answer),
            InputEvent::Eof | InputEvent::Interrupted => false,
        };
        if !accepted {
            debug!("Transcript save declined");
            return Ok(PersistOutcome::Declined);
        }

        let mut stamp = now;
        let mut attempt = 1;
        loop {
            let file_name = transcript_file_name(stamp);
            match store.save(&file_name, &self.buffer).await {
                Ok(path) => return Ok(PersistOutcome::Saved(path)),
                Err(err) if attempt < MAX_NAME_ATTEMPTS && is_name_taken(&err) => {
                    debug!(file_name = %file_name, "Transcript name taken, trying the next second");
                    stamp = stamp + TimeDelta::seconds(1);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn is_name_taken(err: &PersistError) -> bool {
    matches!(
        err,
        PersistError::Write { source, .. } if source.kind() == std::io::ErrorKind::AlreadyExists
    )
}

/// Empty, `Y` and `y` mean yes; everything else means no.
pub fn accepts_confirmation(answer: &str) -> bool {
    matches!(answer.trim(), "" | "Y" | "y")
}

/// `summary_go_chat_<YYYY-MM-DD_HH-MM-SS>.txt` for the given instant.
pub fn transcript_file_name(now: DateTime<Local>) -> String {
    format!("{FILE_PREFIX}{}.txt", now.format(TIMESTAMP_FORMAT))
}
