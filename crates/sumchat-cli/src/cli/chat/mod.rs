//! Interactive terminal front end for a chat session.
//!
//! The session logic lives in `sumchat_core::chat`; this module supplies the
//! terminal console it talks to. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod input;
pub mod loop_runner;
pub mod renderer;
