//! Session state and resilience logic for the laws chat client.
//!
//! This crate defines the "ports" (`SessionStorage`, `HttpTransport`) that the
//! infrastructure layer implements. It depends only on `laws-types` -- never
//! on `laws-infra` or any database/IO crate.

pub mod chat;
pub mod dispatch;
pub mod documents;
pub mod effect;
pub mod session;
pub mod storage;
pub mod usage;

#[cfg(test)]
mod testing;
