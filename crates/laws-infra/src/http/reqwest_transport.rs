//! reqwest-backed implementation of `HttpTransport`.
//!
//! Every call builds a fresh request from the `RequestPayload`, so a retried
//! multipart upload carries the same bytes without re-reading the file.

use std::time::Duration;

use laws_core::dispatch::HttpTransport;
use laws_types::error::TransportError;
use laws_types::http::{FilePart, HttpResponse, RequestPayload};
use reqwest::multipart::{Form, Part};

/// Time allowed to establish a connection. Responses themselves are not
/// time-limited.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP transport over a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default client settings.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("laws/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn build(&self, url: &str, payload: &RequestPayload) -> Result<reqwest::RequestBuilder, TransportError> {
        let request = self.client.post(url);
        Ok(match payload {
            RequestPayload::Json(body) => request.json(body),
            RequestPayload::Text(body) => request
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(body.clone()),
            RequestPayload::Multipart { fields, file } => request.multipart(multipart_form(fields, file)?),
        })
    }
}

fn multipart_form(fields: &[(String, String)], file: &FilePart) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name.clone(), value.clone());
    }

    let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    if let Some(content_type) = &file.content_type {
        part = part
            .mime_str(content_type)
            .map_err(|e| TransportError::InvalidRequest(format!("bad content type '{content_type}': {e}")))?;
    }
    Ok(form.part(file.field.clone(), part))
}

impl HttpTransport for ReqwestTransport {
    async fn post(&self, url: &str, payload: &RequestPayload) -> Result<HttpResponse, TransportError> {
        let response = self
            .build(url, payload)?
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn echo_json(Json(body): Json<Value>) -> Json<Value> {
        Json(body)
    }

    async fn echo_text(headers: HeaderMap, body: String) -> String {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        format!("{content_type}|{body}")
    }

    async fn echo_multipart(mut multipart: Multipart) -> Json<Value> {
        let mut parts = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.unwrap();
            parts.push(json!({
                "name": name,
                "file_name": file_name,
                "content_type": content_type,
                "data": String::from_utf8_lossy(&data),
            }));
        }
        Json(Value::Array(parts))
    }

    async fn overloaded() -> (StatusCode, &'static str) {
        (StatusCode::SERVICE_UNAVAILABLE, "busy")
    }

    async fn serve() -> String {
        let app = Router::new()
            .route("/json", post(echo_json))
            .route("/text", post(echo_text))
            .route("/upload", post(echo_multipart))
            .route("/busy", post(overloaded));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_json_payload() {
        let base = serve().await;
        let transport = ReqwestTransport::new().unwrap();
        let body = json!({"query": "hello", "chat_history": [], "intent": "order"});

        let response = transport
            .post(&format!("{base}/json"), &RequestPayload::Json(body.clone()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(serde_json::from_str::<Value>(&response.body).unwrap(), body);
    }

    #[tokio::test]
    async fn test_text_payload_is_plain_text() {
        let base = serve().await;
        let transport = ReqwestTransport::new().unwrap();

        let response = transport
            .post(&format!("{base}/text"), &RequestPayload::Text("Yes".to_string()))
            .await
            .unwrap();

        assert_eq!(response.body, "text/plain|Yes");
    }

    #[tokio::test]
    async fn test_multipart_payload_can_be_sent_twice() {
        let base = serve().await;
        let transport = ReqwestTransport::new().unwrap();
        let payload = RequestPayload::Multipart {
            fields: vec![("category".to_string(), "tenancy".to_string())],
            file: FilePart {
                field: "file".to_string(),
                file_name: "notes.txt".to_string(),
                content_type: Some("text/plain".to_string()),
                bytes: b"clause 4".to_vec(),
            },
        };
        let url = format!("{base}/upload");

        let first = transport.post(&url, &payload).await.unwrap();
        let second = transport.post(&url, &payload).await.unwrap();
        assert_eq!(first.body, second.body);

        let parts: Value = serde_json::from_str(&first.body).unwrap();
        assert_eq!(parts[0]["name"], "category");
        assert_eq!(parts[0]["data"], "tenancy");
        assert_eq!(parts[1]["name"], "file");
        assert_eq!(parts[1]["file_name"], "notes.txt");
        assert_eq!(parts[1]["content_type"], "text/plain");
        assert_eq!(parts[1]["data"], "clause 4");
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_an_error() {
        let base = serve().await;
        let transport = ReqwestTransport::new().unwrap();

        let response = transport
            .post(&format!("{base}/busy"), &RequestPayload::Text(String::new()))
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(response.body, "busy");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new().unwrap();
        let err = transport
            .post(&format!("http://{addr}/json"), &RequestPayload::Json(json!({})))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Request(_)));
    }

    #[tokio::test]
    async fn test_invalid_content_type_is_rejected_before_sending() {
        let transport = ReqwestTransport::new().unwrap();
        let payload = RequestPayload::Multipart {
            fields: Vec::new(),
            file: FilePart {
                field: "file".to_string(),
                file_name: "x".to_string(),
                content_type: Some("not a mime type".to_string()),
                bytes: Vec::new(),
            },
        };

        let err = transport
            .post("http://127.0.0.1:9/upload", &payload)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }
}
