//! The chat session state machine.
//!
//! ```text
//!            +---------------------------+
//!            v                           |
//!   AwaitingInput --line--> classify --> Help | Save | Turn
//!            |
//!            +--exit/quit/EOF--> final save prompt --> Ended
//! ```
//!
//! The session owns the conversation history and the transcript. Everything
//! happens on one sequential path: read a line, handle it completely
//! (including draining a reply stream), then read the next line.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use sumchat_types::config::SessionConfig;
use sumchat_types::llm::CompletionRequest;

use crate::llm::provider::LlmProvider;

use super::commands::{ChatCommand, classify};
use super::console::{ChatConsole, InputEvent, SessionEvent, USER_PROMPT};
use super::conversation::Conversation;
use super::store::TranscriptStore;
use super::transcript::{PersistOutcome, TranscriptRecorder};
use super::turn::{TurnError, execute_turn};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Ended,
}

/// What a finished session did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Completed turns (including ones cut short mid-stream).
    pub turns: usize,
    /// Transcript files written during the session, in order.
    pub saved: Vec<PathBuf>,
}

/// One interactive chat session.
pub struct ChatSession<P, C, S> {
    config: SessionConfig,
    provider: P,
    console: C,
    store: S,
    conversation: Conversation,
    transcript: TranscriptRecorder,
    state: SessionState,
    summary: SessionSummary,
    /// Source of the timestamp in transcript file names.
    clock: fn() -> DateTime<Local>,
}

impl<P, C, S> ChatSession<P, C, S>
where
    P: LlmProvider,
    C: ChatConsole,
    S: TranscriptStore,
{
    pub fn new(config: SessionConfig, provider: P, console: C, store: S) -> Self {
        let conversation = Conversation::new(config.system_prompt.clone());
        Self {
            config,
            provider,
            console,
            store,
            conversation,
            transcript: TranscriptRecorder::new(),
            state: SessionState::AwaitingInput,
            summary: SessionSummary::default(),
            clock: Local::now,
        }
    }

    /// Replace the wall clock used to name transcript files.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn transcript(&self) -> &TranscriptRecorder {
        &self.transcript
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Run until the user exits or input ends.
    pub async fn run(&mut self) -> SessionSummary {
        info!(
            provider = self.provider.name(),
            model = %self.config.model,
            "Chat session started"
        );
        self.console.emit(SessionEvent::Help);

        while self.state == SessionState::AwaitingInput {
            self.step().await;
        }

        info!(
            turns = self.summary.turns,
            saved = self.summary.saved.len(),
            "Chat session ended"
        );
        self.summary.clone()
    }

    /// Read and handle exactly one input. Does nothing once ended.
    pub async fn step(&mut self) {
        if self.state == SessionState::Ended {
            return;
        }

        match self.console.read_line(USER_PROMPT).await {
            InputEvent::Eof => {
                debug!("End of input, closing session");
                self.finish().await;
            }
            InputEvent::Interrupted => {
                self.console.emit(SessionEvent::InterruptHint);
            }
            InputEvent::Line(line) => match classify(&line) {
                ChatCommand::Exit => self.finish().await,
                ChatCommand::Save => self.save().await,
                ChatCommand::Help => self.console.emit(SessionEvent::Help),
                ChatCommand::Turn(text) => self.take_turn(text).await,
            },
        }
    }

    async fn take_turn(&mut self, text: String) {
        let request = CompletionRequest::streaming(
            self.config.model.clone(),
            self.conversation.request_messages(&text),
        );

        self.console.emit(SessionEvent::ReplyStarted);
        let console = &mut self.console;
        let result = execute_turn(&self.provider, request, |fragment| {
            console.emit(SessionEvent::Fragment(fragment.to_string()));
        })
        .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(TurnError::Establish(err)) => {
                self.console.emit(SessionEvent::TurnAborted(err));
                return;
            }
        };

        match outcome.interrupted {
            Some(err) => self.console.emit(SessionEvent::ReplyInterrupted(err)),
            None => self.console.emit(SessionEvent::ReplyFinished {
                stop_reason: outcome.stop_reason,
                usage: outcome.usage,
            }),
        }

        self.transcript.record_turn(&text, &outcome.reply);
        self.conversation.record_exchange(text, outcome.reply);
        self.summary.turns += 1;
    }

    async fn save(&mut self) {
        match self
            .transcript
            .persist(&mut self.console, &self.store, (self.clock)())
            .await
        {
            Ok(PersistOutcome::Saved(path)) => {
                info!(path = %path.display(), "Transcript saved");
                self.summary.saved.push(path.clone());
                self.console.emit(SessionEvent::Saved(path));
            }
            Ok(PersistOutcome::Declined) => {
                self.console.emit(SessionEvent::SaveDeclined);
            }
            Err(err) => {
                warn!(error = %err, "Failed to save transcript");
                self.console.emit(SessionEvent::SaveFailed(err));
            }
        }
    }

    async fn finish(&mut self) {
        self.save().await;
        self.state = SessionState::Ended;
        self.console.emit(SessionEvent::Ended {
            turns: self.summary.turns,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::testing::{MemoryStore, ScriptedConsole, ScriptedProvider};
    use crate::chat::transcript::SAVE_PROMPT;
    use sumchat_types::llm::{LlmError, MessageRole};

    type TestSession = ChatSession<ScriptedProvider, ScriptedConsole, MemoryStore>;

    fn config() -> SessionConfig {
        SessionConfig {
            model: "test-model".to_string(),
            system_prompt: "You are a test.".to_string(),
        }
    }

    fn session(provider: ScriptedProvider, console: ScriptedConsole) -> TestSession {
        ChatSession::new(config(), provider, console, MemoryStore::default())
    }

    #[tokio::test]
    async fn test_turns_grow_conversation_by_two() {
        let provider = ScriptedProvider::new();
        provider.push_reply(&["one"]);
        provider.push_reply(&["two"]);
        provider.push_reply(&["three"]);
        let console = ScriptedConsole::new(["a", "b", "c", "exit", "n"]);

        let mut session = session(provider, console);
        let summary = session.run().await;

        assert_eq!(summary.turns, 3);
        assert_eq!(session.conversation().len(), 1 + 2 * 3);
        assert_eq!(session.state(), SessionState::Ended);

        let contents: Vec<&str> = session
            .conversation()
            .messages()
            .iter()
            .map(|m| m.content())
            .collect();
        assert_eq!(
            contents,
            vec!["You are a test.", "a", "one", "b", "two", "c", "three"]
        );
    }

    #[tokio::test]
    async fn test_each_request_carries_full_history() {
        let provider = ScriptedProvider::new();
        provider.push_reply(&["hello"]);
        provider.push_reply(&["again"]);
        let console = ScriptedConsole::new(["hi", "more", "quit", "n"]);

        let mut session = session(provider, console);
        session.run().await;

        let requests = session.provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[1].messages.len(), 4);
        assert_eq!(requests[1].messages[3].content(), "more");
        assert!(requests.iter().all(|r| r.max_tokens == 200));
        assert!(requests.iter().all(|r| r.model == "test-model"));
        assert_eq!(requests[0].messages[0].role(), MessageRole::System);
    }

    #[tokio::test]
    async fn test_transcript_after_one_turn() {
        let provider = ScriptedProvider::new();
        provider.push_reply(&["hel", "lo"]);
        let console = ScriptedConsole::new(["hi", "exit", "n"]);

        let mut session = session(provider, console);
        session.run().await;

        assert_eq!(
            session.transcript().as_str(),
            "You:\n hi\n\nAssistant:\n hello\n\n\n"
        );
        assert_eq!(session.console().printed_fragments(), "hello");
    }

    #[tokio::test]
    async fn test_establish_error_leaves_conversation_unchanged() {
        let provider = ScriptedProvider::new();
        provider.push_establish_failure(LlmError::AuthenticationFailed);
        provider.push_reply(&["recovered"]);
        let console = ScriptedConsole::new(["first", "second", "exit", "n"]);

        let mut session = session(provider, console);
        let summary = session.run().await;

        assert_eq!(summary.turns, 1);
        assert_eq!(session.conversation().len(), 3);
        assert_eq!(session.conversation().messages()[1].content(), "second");
        assert!(
            session
                .console()
                .events
                .iter()
                .any(|e| matches!(e, SessionEvent::TurnAborted(LlmError::AuthenticationFailed)))
        );
        assert!(!session.transcript().as_str().contains("first"));
    }

    #[tokio::test]
    async fn test_mid_stream_error_keeps_partial_reply() {
        let provider = ScriptedProvider::new();
        provider.push_interrupted(&["par"], LlmError::Stream("reset".to_string()));
        let console = ScriptedConsole::new(["tell me", "exit", "n"]);

        let mut session = session(provider, console);
        session.run().await;

        let messages = session.conversation().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].role(), MessageRole::Assistant);
        assert_eq!(messages[2].content(), "par");
        assert!(
            session
                .console()
                .events
                .iter()
                .any(|e| matches!(e, SessionEvent::ReplyInterrupted(_)))
        );
    }

    #[tokio::test]
    async fn test_empty_input_is_sent_as_turn() {
        let provider = ScriptedProvider::new();
        provider.push_reply(&["?"]);
        let console = ScriptedConsole::new(["", "exit", "n"]);

        let mut session = session(provider, console);
        session.run().await;

        assert_eq!(session.conversation().len(), 3);
        assert_eq!(session.conversation().messages()[1].content(), "");
    }

    #[tokio::test]
    async fn test_save_does_not_consume_turn() {
        let provider = ScriptedProvider::new();
        provider.push_reply(&["hello"]);
        let console = ScriptedConsole::new(["hi", "save", "y", "exit", "n"]);

        let mut session = session(provider, console);
        let summary = session.run().await;

        assert_eq!(summary.turns, 1);
        assert_eq!(summary.saved.len(), 1);
        assert_eq!(session.provider.requests().len(), 1);
        let files = session.store.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].1, "You:\n hi\n\nAssistant:\n hello\n\n\n");
    }

    #[tokio::test]
    async fn test_help_redisplays_and_continues() {
        let provider = ScriptedProvider::new();
        let console = ScriptedConsole::new(["help", "exit", "n"]);

        let mut session = session(provider, console);
        session.run().await;

        let helps = session
            .console()
            .events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Help))
            .count();
        // Once at start, once on request.
        assert_eq!(helps, 2);
        assert!(session.provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_saves_in_same_second_keep_every_turn() {
        fn frozen() -> DateTime<Local> {
            use chrono::TimeZone;
            Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
        }

        let provider = ScriptedProvider::new();
        provider.push_reply(&["hello"]);
        provider.push_reply(&["stuff"]);
        let console = ScriptedConsole::new(["hi", "save", "y", "more", "exit", "y"]);

        let mut session = session(provider, console).with_clock(frozen);
        let summary = session.run().await;

        assert_eq!(summary.turns, 2);
        assert_eq!(
            summary.saved,
            vec![
                PathBuf::from("memory/summary_go_chat_2024-03-09_14-05-07.txt"),
                PathBuf::from("memory/summary_go_chat_2024-03-09_14-05-08.txt"),
            ]
        );
        let files = session.store.files();
        assert_eq!(files.len(), 2);
        assert_eq!(
            files[1].1,
            "You:\n hi\n\nAssistant:\n hello\n\n\nYou:\n more\n\nAssistant:\n stuff\n\n\n"
        );
        assert!(
            !session
                .console()
                .events
                .iter()
                .any(|e| matches!(e, SessionEvent::SaveFailed(_)))
        );
    }

    #[tokio::test]
    async fn test_eof_flows_into_final_save() {
        let provider = ScriptedProvider::new();
        provider.push_reply(&["hello"]);
        // "hi" then EOF; the save prompt reads a scripted yes.
        let console = ScriptedConsole::from_events([
            InputEvent::Line("hi".to_string()),
            InputEvent::Eof,
            InputEvent::Line(String::new()),
        ]);

        let mut session = session(provider, console);
        let summary = session.run().await;

        assert_eq!(session.state(), SessionState::Ended);
        assert_eq!(summary.saved.len(), 1);
        assert_eq!(session.console().prompts().last().unwrap(), SAVE_PROMPT);
        assert!(matches!(
            session.console().events.last(),
            Some(SessionEvent::Ended { turns: 1 })
        ));
    }

    #[tokio::test]
    async fn test_exit_with_declined_save_writes_nothing() {
        let provider = ScriptedProvider::new();
        let console = ScriptedConsole::new(["exit", "n"]);

        let mut session = session(provider, console);
        let summary = session.run().await;

        assert!(summary.saved.is_empty());
        assert!(session.store.files().is_empty());
        assert!(
            session
                .console()
                .events
                .iter()
                .any(|e| matches!(e, SessionEvent::SaveDeclined))
        );
    }

    #[tokio::test]
    async fn test_save_failure_keeps_session_running() {
        let provider = ScriptedProvider::new();
        provider.push_reply(&["still here"]);
        let console = ScriptedConsole::new(["save", "y", "ping", "exit", "n"]);

        let mut session = ChatSession::new(config(), provider, console, MemoryStore::failing());
        let summary = session.run().await;

        assert_eq!(summary.turns, 1);
        assert!(
            session
                .console()
                .events
                .iter()
                .any(|e| matches!(e, SessionEvent::SaveFailed(_)))
        );
    }

    #[tokio::test]
    async fn test_interrupt_does_not_end_session() {
        let provider = ScriptedProvider::new();
        let console = ScriptedConsole::from_events([
            InputEvent::Interrupted,
            InputEvent::Line("exit".to_string()),
            InputEvent::Line("n".to_string()),
        ]);

        let mut session = session(provider, console);
        session.run().await;

        assert!(
            session
                .console()
                .events
                .iter()
                .any(|e| matches!(e, SessionEvent::InterruptHint))
        );
        assert_eq!(session.conversation().len(), 1);
    }

    #[tokio::test]
    async fn test_reserved_word_in_other_case_is_sent() {
        let provider = ScriptedProvider::new();
        provider.push_reply(&["bye?"]);
        let console = ScriptedConsole::new(["Exit", "exit", "n"]);

        let mut session = session(provider, console);
        let summary = session.run().await;

        assert_eq!(summary.turns, 1);
        assert_eq!(session.conversation().messages()[1].content(), "Exit");
    }

    #[tokio::test]
    async fn test_step_after_end_is_noop() {
        let provider = ScriptedProvider::new();
        let console = ScriptedConsole::new(["exit", "n", "hi"]);

        let mut session = session(provider, console);
        session.run().await;
        session.step().await;

        assert_eq!(session.console().prompts().len(), 2);
        assert!(session.provider.requests().is_empty());
    }
}
