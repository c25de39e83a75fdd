//! Reserved-word command classification for the chat loop.
//!
//! Input is matched exactly (after trimming) against `exit`, `quit`, `save`
//! and `help`. There is no case-folding and no prefix matching, so a message
//! that is exactly one of these words can never be sent to the assistant.

/// What a line of user input means to the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// End the session (`exit` or `quit`).
    Exit,
    /// Persist the transcript and keep chatting.
    Save,
    /// Show the command summary.
    Help,
    /// Anything else: send it to the assistant.
    Turn(String),
}

/// Command summary shown at session start and on `help`.
pub const HELP_ENTRIES: &[(&str, &str)] = &[
    ("exit", "End the chat session (offers to save first)"),
    ("quit", "Same as exit"),
    ("save", "Save the transcript so far"),
    ("help", "Show this help message"),
];

/// Classify one line of user input.
pub fn classify(input: &str) -> ChatCommand {
    let trimmed = input.trim();
    match trimmed {
        "exit" | "quit" => ChatCommand::Exit,
        "save" => ChatCommand::Save,
        "help" => ChatCommand::Help,
        _ => ChatCommand::Turn(trimmed.to_string()),
    }
}
