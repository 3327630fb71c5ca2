//! Transport-neutral HTTP request payloads and responses.
//!
//! Payloads are plain data so the same body can be sent twice (primary, then
//! secondary) without re-reading any file. The transport builds a fresh wire
//! request from the payload on every attempt.

use serde::Serialize;

/// Status code signalling the backend is overloaded and a fallback may be tried.
pub const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

/// Status code signalling the session is sending too many requests.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Status code for a client-side error with a human-readable message.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Body of a POST request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    /// `application/json` body.
    Json(serde_json::Value),
    /// `text/plain` body.
    Text(String),
    /// `multipart/form-data` with text fields followed by one file part.
    Multipart {
        fields: Vec<(String, String)>,
        file: FilePart,
    },
}

impl RequestPayload {
    /// Serialize a value into a JSON payload.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestPayload::Json(_) => "json",
            RequestPayload::Text(_) => "text",
            RequestPayload::Multipart { .. } => "multipart",
        }
    }
}

/// File attached to a multipart payload.
#[derive(Clone, PartialEq)]
pub struct FilePart {
    /// Form field name (e.g. `file`).
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Response as received from the transport: status code plus raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
