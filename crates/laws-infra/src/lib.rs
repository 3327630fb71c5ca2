//! Infrastructure layer for the laws chat client.
//!
//! Contains implementations of the ports defined in `laws-core`: the reqwest
//! HTTP transport and the in-memory and SQLite session storage backends, plus
//! config loading and filesystem helpers.

pub mod config;
pub mod filesystem;
pub mod http;
pub mod sqlite;
pub mod storage;
