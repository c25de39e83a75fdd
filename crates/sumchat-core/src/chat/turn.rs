//! Executes one conversational turn against a provider.
//!
//! The reply stream is drained to completion (or to its first error) before
//! this returns, so turns never overlap.

use futures_util::StreamExt;
use tracing::{debug, info_span, warn};

use sumchat_types::llm::{CompletionRequest, LlmError, StopReason, StreamEvent, Usage};

use crate::llm::provider::LlmProvider;
use crate::llm::span::StreamInSpan;

/// What a turn produced once its stream ended.
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    /// All fragments concatenated in arrival order.
    pub reply: String,
    /// Number of fragments received.
    pub fragments: usize,
    pub stop_reason: Option<StopReason>,
    pub usage: Option<Usage>,
    /// Set when the stream failed after it was established. `reply` then
    /// holds whatever arrived before the failure.
    pub interrupted: Option<LlmError>,
}

/// A turn that produced no reply at all.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("could not start reply stream: {0}")]
    Establish(#[source] LlmError),
}

/// Send `request` and drain the reply stream, calling `on_fragment` for each
/// text fragment as it arrives.
pub async fn execute_turn<P, F>(
    provider: &P,
    request: CompletionRequest,
    mut on_fragment: F,
) -> Result<TurnOutcome, TurnError>
where
    P: LlmProvider,
    F: FnMut(&str),
{
    let span = info_span!(
        "llm.stream",
        provider = provider.name(),
        model = %request.model,
        max_tokens = request.max_tokens,
        messages = request.messages.len(),
    );
    let mut stream = StreamInSpan::new(provider.stream(request), span);

    let mut established = false;
    let mut outcome = TurnOutcome::default();

    while let Some(item) = stream.next().await {
        match item {
            Ok(StreamEvent::Connected) => {
                debug!("Reply stream established");
                established = true;
            }
            Ok(StreamEvent::TextDelta { text }) => {
                established = true;
                on_fragment(&text);
                outcome.reply.push_str(&text);
                outcome.fragments += 1;
            }
            Ok(StreamEvent::MessageDelta { stop_reason }) => {
                outcome.stop_reason = Some(stop_reason);
            }
            Ok(StreamEvent::Usage(usage)) => {
                outcome.usage = Some(usage);
            }
            Ok(StreamEvent::Done) => break,
            Err(err) if !established => {
                warn!(error = %err, "Reply stream could not be established");
                return Err(TurnError::Establish(err));
            }
            Err(err) => {
                warn!(
                    error = %err,
                    received = outcome.reply.len(),
                    "Reply stream failed mid-way, keeping partial reply"
                );
                outcome.interrupted = Some(err);
                break;
            }
        }
    }

    debug!(
        fragments = outcome.fragments,
        chars = outcome.reply.len(),
        "Reply stream finished"
    );
    Ok(outcome)
}
