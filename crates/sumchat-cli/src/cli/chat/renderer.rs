//! Terminal rendering of session events.
//!
//! `ConsoleRenderer` is the CLI's [`ChatConsole`]: it reads lines through
//! [`ChatInput`] and prints every [`SessionEvent`] with `console` styles.
//! Reply fragments are printed raw as they arrive, with a thinking spinner
//! until the first one shows up.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use sumchat_core::chat::commands::HELP_ENTRIES;
use sumchat_core::chat::console::{ChatConsole, InputEvent, SessionEvent};
use sumchat_types::llm::{LlmError, StopReason, Usage};

use super::input::ChatInput;

/// Terminal console for a chat session.
pub struct ConsoleRenderer {
    input: ChatInput,
    spinner: Option<ProgressBar>,
    /// True while an assistant reply line is being printed.
    reply_open: bool,
}

impl ConsoleRenderer {
    pub fn new(input: ChatInput) -> Self {
        Self {
            input,
            spinner: None,
            reply_open: false,
        }
    }

    fn start_spinner(&mut self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print a single streaming fragment (raw, no formatting).
    fn print_fragment(&mut self, text: &str) {
        self.stop_spinner();
        if !self.reply_open {
            self.reply_open = true;
            print!("{} ", style("Assistant:").green().bold());
        }
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    /// End the reply line, if one is open.
    fn close_reply(&mut self) {
        self.stop_spinner();
        if self.reply_open {
            self.reply_open = false;
            println!();
        }
    }

    fn print_help(&self) {
        println!();
        println!("  {}", style("Commands:").bold());
        for (name, description) in HELP_ENTRIES {
            println!("  {}", help_line(name, description));
        }
        println!();
    }
}

impl ChatConsole for ConsoleRenderer {
    async fn read_line(&mut self, prompt: &str) -> InputEvent {
        self.close_reply();
        self.input.read_line(prompt).await
    }

    fn emit(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Help => self.print_help(),
            SessionEvent::ReplyStarted => self.start_spinner(),
            SessionEvent::Fragment(text) => self.print_fragment(&text),
            SessionEvent::ReplyFinished { stop_reason, usage } => {
                self.close_reply();
                println!("{}", style(finish_note(stop_reason, usage)).dim());
            }
            SessionEvent::ReplyInterrupted(err) => {
                self.close_reply();
                println!(
                    "{} {}",
                    style("Stream interrupted:").red().bold(),
                    style(&err).red()
                );
                println!("{}", style("The partial reply was kept.").dim());
            }
            SessionEvent::TurnAborted(err) => {
                self.close_reply();
                println!(
                    "{} {}",
                    style("Request failed:").red().bold(),
                    style(&err).red()
                );
                if let Some(hint) = error_hint(&err) {
                    println!("{}", style(hint).dim());
                }
            }
            SessionEvent::InterruptHint => {
                println!(
                    "{}",
                    style("Type exit or press Ctrl+D to end the session").dim()
                );
            }
            SessionEvent::Saved(path) => {
                println!(
                    "{} {}",
                    style("Transcript saved to").green(),
                    style(path.display()).cyan()
                );
            }
            SessionEvent::SaveDeclined => {
                println!("{}", style("Transcript not saved").dim());
            }
            SessionEvent::SaveFailed(err) => {
                println!(
                    "{} {}",
                    style("Could not save transcript:").red().bold(),
                    style(&err).red()
                );
            }
            SessionEvent::Ended { turns } => {
                self.close_reply();
                println!();
                println!("  {}", style(goodbye_line(turns)).dim());
            }
        }
    }
}

fn help_line(name: &str, description: &str) -> String {
    format!("{name:<6} {description}")
}

/// Status line printed after a reply finishes streaming.
fn finish_note(stop_reason: Option<StopReason>, usage: Option<Usage>) -> String {
    let mut details = Vec::new();
    if let Some(usage) = usage {
        details.push(format!(
            "{} in / {} out tokens",
            usage.input_tokens, usage.output_tokens
        ));
    }
    if stop_reason == Some(StopReason::MaxTokens) {
        details.push("reply cut at the token limit".to_string());
    } else if stop_reason == Some(StopReason::ContentFilter) {
        details.push("reply stopped by the content filter".to_string());
    }

    if details.is_empty() {
        "Stream finished".to_string()
    } else {
        format!("Stream finished ({})", details.join(", "))
    }
}

fn error_hint(err: &LlmError) -> Option<&'static str> {
    match err {
        LlmError::AuthenticationFailed => {
            Some("Check openai_key in ~/.sumchat.toml or the OPENAI_API_KEY variable.")
        }
        LlmError::RateLimited => Some("Wait a moment and send the message again."),
        _ => None,
    }
}

fn goodbye_line(turns: usize) -> String {
    match turns {
        1 => "Goodbye! (1 turn)".to_string(),
        n => format!("Goodbye! ({n} turns)"),
    }
}
