//! Primary/secondary failover dispatch.
//!
//! A logical request goes to the primary endpoint. If the primary answers
//! 503 (overloaded), the identical payload is sent once to the secondary and
//! that outcome is final. 429 is terminal and never retried. Nothing is
//! remembered between calls: no retry counters, no circuit breaker.

use std::time::Instant;

use laws_types::config::FailoverEndpoints;
use laws_types::error::DispatchError;
use laws_types::http::{
    HttpResponse, RequestPayload, STATUS_BAD_REQUEST, STATUS_SERVICE_UNAVAILABLE,
    STATUS_TOO_MANY_REQUESTS,
};
use laws_types::wire::server_message;

use super::transport::HttpTransport;

/// Which endpoint produced the final response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Primary,
    Secondary,
}

/// Result of a successful dispatch.
#[derive(Debug)]
pub struct DispatchResult {
    /// The 2xx response.
    pub response: HttpResponse,
    /// Endpoint that handled the request.
    pub served_by: Backend,
}

impl DispatchResult {
    pub fn failed_over(&self) -> bool {
        self.served_by == Backend::Secondary
    }
}

/// Sends requests with a single overload fallback.
pub struct FailoverDispatcher<T: HttpTransport> {
    transport: T,
}

impl<T: HttpTransport> FailoverDispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `payload` to `primary`, falling back to `secondary` once on 503.
    ///
    /// Returns the 2xx response, or the classified failure of the final attempt.
    pub async fn send(
        &self,
        primary: &str,
        secondary: Option<&str>,
        payload: &RequestPayload,
    ) -> Result<DispatchResult, DispatchError> {
        let response = self.attempt(primary, payload).await?;

        if response.status != STATUS_SERVICE_UNAVAILABLE {
            return classify(response, primary, Backend::Primary);
        }

        let Some(secondary) = secondary else {
            tracing::warn!(url = %primary, "Primary overloaded and no secondary configured");
            return Err(DispatchError::Overloaded {
                url: primary.to_string(),
            });
        };

        tracing::warn!(
            primary = %primary,
            secondary = %secondary,
            "Primary overloaded, retrying once against secondary"
        );
        let response = self.attempt(secondary, payload).await?;
        classify(response, secondary, Backend::Secondary)
    }

    /// Convenience wrapper over [`send`](Self::send) for configured endpoints.
    pub async fn send_to(
        &self,
        endpoints: &FailoverEndpoints,
        payload: &RequestPayload,
    ) -> Result<DispatchResult, DispatchError> {
        self.send(&endpoints.primary, endpoints.secondary.as_deref(), payload)
            .await
    }

    /// Send once with no fallback (endpoints without a secondary contract).
    pub async fn send_once(
        &self,
        url: &str,
        payload: &RequestPayload,
    ) -> Result<DispatchResult, DispatchError> {
        let response = self.attempt(url, payload).await?;
        classify(response, url, Backend::Primary)
    }

    async fn attempt(
        &self,
        url: &str,
        payload: &RequestPayload,
    ) -> Result<HttpResponse, DispatchError> {
        let start = Instant::now();
        match self.transport.post(url, payload).await {
            Ok(response) => {
                tracing::debug!(
                    url = %url,
                    kind = payload.kind(),
                    status = response.status,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Request completed"
                );
                Ok(response)
            }
            Err(err) => {
                tracing::error!(url = %url, error = %err, "Request failed without a response");
                Err(err.into())
            }
        }
    }
}

/// Map a final response to success or a typed failure.
fn classify(
    response: HttpResponse,
    url: &str,
    served_by: Backend,
) -> Result<DispatchResult, DispatchError> {
    if response.is_success() {
        return Ok(DispatchResult {
            response,
            served_by,
        });
    }

    Err(match response.status {
        STATUS_TOO_MANY_REQUESTS => DispatchError::RateLimited {
            detail: server_message(&response.body),
        },
        STATUS_BAD_REQUEST => DispatchError::BadRequest {
            message: server_message(&response.body),
        },
        STATUS_SERVICE_UNAVAILABLE => DispatchError::Overloaded {
            url: url.to_string(),
        },
        status => DispatchError::Status {
            status,
            body: response.body,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use laws_types::error::TransportError;

    const PRIMARY: &str = "http://primary/chat";
    const SECONDARY: &str = "http://secondary/chat";

    fn payload() -> RequestPayload {
        RequestPayload::Json(serde_json::json!({"query": "hello"}))
    }

    #[tokio::test]
    async fn test_primary_success_never_touches_secondary() {
        let transport = MockTransport::new().respond(PRIMARY, 200, "[]");
        let dispatcher = FailoverDispatcher::new(transport);

        let result = dispatcher
            .send(PRIMARY, Some(SECONDARY), &payload())
            .await
            .unwrap();

        assert_eq!(result.served_by, Backend::Primary);
        assert!(!result.failed_over());
        assert_eq!(dispatcher.transport().calls_to(SECONDARY), 0);
    }

    #[tokio::test]
    async fn test_overload_retries_secondary_exactly_once() {
        let transport = MockTransport::new()
            .respond(PRIMARY, 503, "busy")
            .respond(SECONDARY, 200, "[\"ok\"]");
        let dispatcher = FailoverDispatcher::new(transport);

        let result = dispatcher
            .send(PRIMARY, Some(SECONDARY), &payload())
            .await
            .unwrap();

        assert_eq!(result.served_by, Backend::Secondary);
        assert_eq!(result.response.body, "[\"ok\"]");
        let calls = dispatcher.transport().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, PRIMARY);
        assert_eq!(calls[1].0, SECONDARY);
        assert_eq!(calls[0].1, calls[1].1, "secondary must receive the identical payload");
    }

    #[tokio::test]
    async fn test_secondary_failure_is_final() {
        let transport = MockTransport::new()
            .respond(PRIMARY, 503, "")
            .respond(SECONDARY, 503, "")
            .respond(PRIMARY, 200, "[]");
        let dispatcher = FailoverDispatcher::new(transport);

        let err = dispatcher
            .send(PRIMARY, Some(SECONDARY), &payload())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Overloaded { ref url } if url == SECONDARY));
        assert_eq!(dispatcher.transport().calls_to(PRIMARY), 1);
        assert_eq!(dispatcher.transport().calls_to(SECONDARY), 1);
    }

    #[tokio::test]
    async fn test_secondary_transport_error_is_reported() {
        let transport = MockTransport::new()
            .respond(PRIMARY, 503, "")
            .fail(SECONDARY, "connection refused");
        let dispatcher = FailoverDispatcher::new(transport);

        let err = dispatcher
            .send(PRIMARY, Some(SECONDARY), &payload())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Transport(TransportError::Request(_))));
    }

    #[tokio::test]
    async fn test_overload_without_secondary() {
        let transport = MockTransport::new().respond(PRIMARY, 503, "");
        let dispatcher = FailoverDispatcher::new(transport);

        let err = dispatcher.send(PRIMARY, None, &payload()).await.unwrap_err();

        assert!(matches!(err, DispatchError::Overloaded { ref url } if url == PRIMARY));
        assert_eq!(dispatcher.transport().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_terminal() {
        let transport = MockTransport::new().respond(PRIMARY, 429, r#"{"detail":"slow down"}"#);
        let dispatcher = FailoverDispatcher::new(transport);

        let err = dispatcher
            .send(PRIMARY, Some(SECONDARY), &payload())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::RateLimited { ref detail } if detail == "slow down"));
        assert_eq!(dispatcher.transport().calls_to(SECONDARY), 0);
    }

    #[tokio::test]
    async fn test_bad_request_message_is_surfaced() {
        let transport = MockTransport::new().respond(PRIMARY, 400, r#""Unsupported file type""#);
        let dispatcher = FailoverDispatcher::new(transport);

        let err = dispatcher.send(PRIMARY, None, &payload()).await.unwrap_err();

        assert!(
            matches!(err, DispatchError::BadRequest { ref message } if message == "Unsupported file type")
        );
    }

    #[tokio::test]
    async fn test_other_status_is_generic_failure() {
        let transport = MockTransport::new().respond(PRIMARY, 500, "internal");
        let dispatcher = FailoverDispatcher::new(transport);

        let err = dispatcher
            .send(PRIMARY, Some(SECONDARY), &payload())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Status { status: 500, .. }));
        assert_eq!(dispatcher.transport().calls_to(SECONDARY), 0);
    }

    #[tokio::test]
    async fn test_primary_transport_error_does_not_fail_over() {
        let transport = MockTransport::new()
            .fail(PRIMARY, "dns failure")
            .respond(SECONDARY, 200, "[]");
        let dispatcher = FailoverDispatcher::new(transport);

        let err = dispatcher
            .send(PRIMARY, Some(SECONDARY), &payload())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Transport(_)));
        assert_eq!(dispatcher.transport().calls_to(SECONDARY), 0);
    }

    #[tokio::test]
    async fn test_send_once_ignores_overload_fallback() {
        let transport = MockTransport::new().respond(PRIMARY, 503, "");
        let dispatcher = FailoverDispatcher::new(transport);

        let err = dispatcher
            .send_once(PRIMARY, &RequestPayload::Text("Yes".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Overloaded { .. }));
        assert_eq!(dispatcher.transport().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_send_to_uses_configured_endpoints() {
        let transport = MockTransport::new()
            .respond(PRIMARY, 503, "")
            .respond(SECONDARY, 201, "{}");
        let dispatcher = FailoverDispatcher::new(transport);
        let endpoints = FailoverEndpoints::new(PRIMARY, Some(SECONDARY.to_string()));

        let result = dispatcher.send_to(&endpoints, &payload()).await.unwrap();
        assert_eq!(result.response.status, 201);
        assert!(result.failed_over());
    }
}
