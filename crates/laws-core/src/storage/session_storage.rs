//! SessionStorage trait definition.
//!
//! Session storage is a flat string-to-string store whose lifetime is the
//! client session. The conversation store, usage meter, and session identity
//! provider all read and write through it.

use laws_types::error::StorageError;
use laws_types::session::SessionId;

/// Fixed key holding the session identifier.
pub const SESSION_ID_KEY: &str = "llm_session_id";

/// Key holding the persisted conversation log for a session.
pub fn chat_history_key(session_id: &SessionId) -> String {
    format!("chat_history_{session_id}")
}

/// Key holding the persisted token count for a session.
pub fn token_count_key(session_id: &SessionId) -> String {
    format!("token_count_{session_id}")
}

/// Trait for session-scoped key-value storage.
///
/// Implementations live in laws-infra (e.g., `MemorySessionStorage`,
/// `SqliteSessionStorage`). Uses native async fn in traits (RPITIT, Rust 2024
/// edition).
pub trait SessionStorage: Send + Sync {
    /// Short backend name for logs and status output (e.g., "memory").
    fn backend(&self) -> &'static str;

    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Delete a key. No-op if the key does not exist.
    fn remove(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
