//! Outbound request dispatch.
//!
//! - `HttpTransport`: single-attempt POST port implemented in laws-infra
//! - `FailoverDispatcher`: primary/secondary fallback on overload

pub mod failover;
pub mod transport;

pub use failover::{Backend, DispatchResult, FailoverDispatcher};
pub use transport::HttpTransport;
