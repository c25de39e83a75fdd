//! The console port: how the session reads input and reports what happens.
//!
//! The session never prints. It emits [`SessionEvent`]s and the console
//! implementation (in the CLI crate) decides how to render them.

use std::future::Future;
use std::path::PathBuf;

use sumchat_types::error::PersistError;
use sumchat_types::llm::{LlmError, StopReason, Usage};

/// Prompt shown before each user turn.
pub const USER_PROMPT: &str = "You: ";

/// Result of reading one line from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A submitted line, already trimmed.
    Line(String),
    /// End of input (Ctrl+D, closed pipe, or a read failure).
    Eof,
    /// Interrupt at the prompt (Ctrl+C).
    Interrupted,
}

/// Something the session wants the user to see.
#[derive(Debug)]
pub enum SessionEvent {
    /// Show the command summary.
    Help,
    /// A turn was submitted; the reply has not arrived yet.
    ReplyStarted,
    /// One fragment of the assistant reply, in arrival order.
    Fragment(String),
    /// The reply stream ended normally.
    ReplyFinished {
        stop_reason: Option<StopReason>,
        usage: Option<Usage>,
    },
    /// The reply stream failed after it was established; the partial reply
    /// was kept.
    ReplyInterrupted(LlmError),
    /// The reply stream could not be established; nothing was recorded.
    TurnAborted(LlmError),
    /// Ctrl+C at the prompt.
    InterruptHint,
    /// The transcript was written.
    Saved(PathBuf),
    /// The user declined to save.
    SaveDeclined,
    /// Writing the transcript failed.
    SaveFailed(PersistError),
    /// The session is over.
    Ended { turns: usize },
}

/// Terminal input and output for a chat session.
pub trait ChatConsole {
    /// Show `prompt` and wait for one line of input.
    fn read_line(&mut self, prompt: &str) -> impl Future<Output = InputEvent>;

    /// Render an event immediately.
    fn emit(&mut self, event: SessionEvent);
}
