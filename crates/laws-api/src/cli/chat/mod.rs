//! Interactive CLI chat experience.
//!
//! Implements the chat loop: markdown rendering of answers, a waiting
//! spinner, the welcome banner, slash commands, and the usage counter.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod budget_display;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
