//! HttpTransport trait definition.
//!
//! The transport performs exactly one POST and reports the raw status and
//! body. It never interprets status codes; classification and failover live
//! in [`FailoverDispatcher`](super::failover::FailoverDispatcher).

use laws_types::error::TransportError;
use laws_types::http::{HttpResponse, RequestPayload};

/// Trait for HTTP backends.
///
/// Implementations live in laws-infra (e.g., `ReqwestTransport`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait HttpTransport: Send + Sync {
    /// POST `payload` to `url`.
    ///
    /// Returns `Err` only when no response was received at all
    /// (connection refused, timeout, unreadable body).
    fn post(
        &self,
        url: &str,
        payload: &RequestPayload,
    ) -> impl std::future::Future<Output = Result<HttpResponse, TransportError>> + Send;
}
