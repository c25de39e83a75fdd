//! In-memory fakes for the chat ports, shared by the unit tests.

use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Mutex;

use sumchat_types::error::PersistError;
use sumchat_types::llm::{CompletionRequest, LlmError, StopReason, StreamEvent};

use crate::llm::provider::{EventStream, LlmProvider};

use super::console::{ChatConsole, InputEvent, SessionEvent};
use super::store::TranscriptStore;

/// Console that replays scripted lines and records everything emitted.
/// Running out of lines reads as EOF.
pub struct ScriptedConsole {
    inputs: VecDeque<InputEvent>,
    prompts: Vec<String>,
    pub events: Vec<SessionEvent>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_events(lines.into_iter().map(|l| InputEvent::Line(l.into())))
    }

    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            inputs: events.into_iter().collect(),
            prompts: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// All fragment text emitted so far, concatenated.
    pub fn printed_fragments(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Fragment(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ChatConsole for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> impl Future<Output = InputEvent> {
        self.prompts.push(prompt.to_string());
        let next = self.inputs.pop_front().unwrap_or(InputEvent::Eof);
        async move { next }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}

/// Provider that plays back one scripted event list per request and keeps
/// every request it was given.
#[derive(Default)]
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Vec<Result<StreamEvent, LlmError>>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_events(&self, events: Vec<Result<StreamEvent, LlmError>>) {
        self.scripts.lock().unwrap().push_back(events);
    }

    /// A normal reply made of the given fragments.
    pub fn push_reply(&self, fragments: &[&str]) {
        let mut events = vec![Ok(StreamEvent::Connected)];
        events.extend(fragments.iter().map(|f| {
            Ok(StreamEvent::TextDelta {
                text: f.to_string(),
            })
        }));
        events.push(Ok(StreamEvent::MessageDelta {
            stop_reason: StopReason::EndTurn,
        }));
        events.push(Ok(StreamEvent::Done));
        self.push_events(events);
    }

    /// A stream that fails before it is established.
    pub fn push_establish_failure(&self, err: LlmError) {
        self.push_events(vec![Err(err)]);
    }

    /// A stream that delivers some fragments and then fails.
    pub fn push_interrupted(&self, fragments: &[&str], err: LlmError) {
        let mut events = vec![Ok(StreamEvent::Connected)];
        events.extend(fragments.iter().map(|f| {
            Ok(StreamEvent::TextDelta {
                text: f.to_string(),
            })
        }));
        events.push(Err(err));
        self.push_events(events);
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn stream(&self, request: CompletionRequest) -> EventStream {
        self.requests.lock().unwrap().push(request);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| vec![Err(LlmError::Provider {
                message: "no scripted reply".to_string(),
            })]);

        Box::pin(async_stream::stream! {
            for item in script {
                yield item;
            }
        })
    }
}

/// Store that keeps saved files in memory. Like the real store it refuses
/// to replace an existing name.
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn files(&self) -> Vec<(String, String)> {
        self.files.lock().unwrap().clone()
    }
}

impl TranscriptStore for MemoryStore {
    async fn save(&self, file_name: &str, contents: &str) -> Result<PathBuf, PersistError> {
        if self.fail {
            return Err(PersistError::HomeDirUnavailable);
        }
        let path = PathBuf::from("memory").join(file_name);
        let mut files = self.files.lock().unwrap();
        if files.iter().any(|(name, _)| name == file_name) {
            return Err(PersistError::Write {
                path,
                source: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
            });
        }
        files.push((file_name.to_string(), contents.to_string()));
        Ok(path)
    }
}
