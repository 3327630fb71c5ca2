use thiserror::Error;

/// Errors from session storage operations (used by trait definitions in laws-core).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by an HTTP transport before any response was received.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors decoding a chat reply into its named structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("expected a JSON array")]
    NotAnArray,

    #[error("expected 4 elements, got {len}")]
    TooShort { len: usize },

    #[error("element {index} ({field}): expected {expected}")]
    WrongType {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

/// Outcome classification for a dispatched request that did not succeed.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    #[error("service overloaded (HTTP 503) at {url}")]
    Overloaded { url: String },

    #[error("rate limited: {detail}")]
    RateLimited { detail: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] DecodeError),
}

impl DispatchError {
    /// Whether the error should block further sends until the session is reset.
    pub fn is_blocking(&self) -> bool {
        matches!(self, DispatchError::RateLimited { .. })
    }
}

/// Errors related to client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}
