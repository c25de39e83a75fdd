//! The chat session: conversation history, in-session commands, turn
//! execution, transcript accumulation, and the loop that ties them together.
//! Entry point: `session::ChatSession::run`.

pub mod commands;
pub mod console;
pub mod conversation;
pub mod session;
pub mod store;
pub mod transcript;
pub mod turn;

#[cfg(test)]
pub(crate) mod testing;
