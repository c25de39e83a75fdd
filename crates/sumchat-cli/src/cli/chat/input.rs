//! Async line input for the chat loop.
//!
//! Interactive terminals go through `rustyline_async::Readline` for line
//! editing and Ctrl+C/Ctrl+D handling. Piped stdin is read line-by-line with
//! tokio so `echo hi | sumchat chat` works.

use std::io::{IsTerminal, Write};

use rustyline_async::{Readline, ReadlineEvent};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use sumchat_core::chat::console::InputEvent;

/// Lines kept for up-arrow recall.
const MAX_HISTORY: usize = 200;

/// Line source for the chat console.
pub enum ChatInput {
    /// A terminal. A `Readline` puts the terminal in raw mode for as long as
    /// it lives, which breaks `println!` newlines while a reply streams, so one
    /// is opened per prompt and the history is carried over by hand.
    Interactive { history: Vec<String> },
    /// Anything that is not a terminal.
    Piped(Lines<BufReader<Stdin>>),
}

impl ChatInput {
    /// Pick the input mode from whether stdin is a terminal.
    pub fn detect() -> Self {
        if std::io::stdin().is_terminal() {
            Self::Interactive {
                history: Vec::new(),
            }
        } else {
            Self::Piped(BufReader::new(tokio::io::stdin()).lines())
        }
    }

    /// Read one line, showing `prompt` first.
    ///
    /// Read failures are reported as `Eof`.
    pub async fn read_line(&mut self, prompt: &str) -> InputEvent {
        match self {
            Self::Interactive { history } => {
                let event = read_interactive(prompt, history).await;
                if let InputEvent::Line(line) = &event {
                    remember(history, line);
                }
                event
            }
            Self::Piped(lines) => {
                print!("{prompt}");
                let _ = std::io::stdout().flush();
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        // Echo so piped sessions read like interactive ones.
                        let line = line.trim().to_string();
                        println!("{line}");
                        InputEvent::Line(line)
                    }
                    Ok(None) => {
                        println!();
                        InputEvent::Eof
                    }
                    Err(err) => {
                        tracing::warn!("Failed to read stdin: {err}");
                        InputEvent::Eof
                    }
                }
            }
        }
    }
}

async fn read_interactive(prompt: &str, history: &[String]) -> InputEvent {
    let (mut rl, _writer) = match Readline::new(prompt.to_string()) {
        Ok(pair) => pair,
        Err(err) => {
            tracing::warn!("Failed to open terminal for reading: {err}");
            return InputEvent::Eof;
        }
    };
    for entry in history {
        let _ = rl.add_history_entry(entry.clone());
    }

    let event = map_readline_result(rl.readline().await);
    let _ = rl.flush();
    event
}

/// Append a submitted line to the recall history, skipping blanks and
/// immediate repeats.
fn remember(history: &mut Vec<String>, line: &str) {
    if line.is_empty() || history.last().is_some_and(|last| last == line) {
        return;
    }
    history.push(line.to_string());
    if history.len() > MAX_HISTORY {
        history.remove(0);
    }
}

fn map_readline_result<E: std::fmt::Display>(result: Result<ReadlineEvent, E>) -> InputEvent {
    match result {
        Ok(ReadlineEvent::Line(line)) => InputEvent::Line(line.trim().to_string()),
        Ok(ReadlineEvent::Eof) => InputEvent::Eof,
        Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
        Err(err) => {
            tracing::warn!("Readline error: {err}");
            InputEvent::Eof
        }
    }
}
