//! LlmProvider trait definition.
//!
//! This is the core abstraction over the remote text-generation service.
//! `stream` returns a `Pin<Box<dyn Stream>>` so the returned stream owns
//! everything it needs and outlives the borrow of the provider.

use std::pin::Pin;

use futures_util::Stream;

use sumchat_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// Boxed stream of reply events returned by [`LlmProvider::stream`].
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for LLM provider backends.
///
/// Implementations live in sumchat-infra (e.g., `OpenAiCompatibleProvider`).
///
/// A stream must yield [`StreamEvent::Connected`] once the transport is
/// established. An `Err` item before that point means the request never
/// reached a streaming state; an `Err` after it is a mid-stream failure.
/// [`StreamEvent::Done`] (or the stream ending) is normal termination.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a streaming completion request. Returns a stream of events.
    fn stream(&self, request: CompletionRequest) -> EventStream;
}
