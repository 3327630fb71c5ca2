//! Shared domain types for the laws chat client.
//!
//! This crate contains the data shapes used across the client: conversation
//! turns and the bounded conversation log, intents, the chat wire format,
//! HTTP payloads, client configuration, and the error enums.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod wire;
