//! Usage meter: cumulative token accounting for a session.
//!
//! The count is stored as a decimal string under `token_count_{session_id}`.
//! It only grows through [`UsageMeter::add_usage`] and returns to zero only
//! through [`UsageMeter::reset`].

use laws_types::error::StorageError;
use laws_types::session::SessionId;

use crate::storage::session_storage::{SessionStorage, token_count_key};

/// Loads, persists and evaluates the session's token count.
pub struct UsageMeter<'s, S: SessionStorage> {
    storage: &'s S,
}

impl<'s, S: SessionStorage> UsageMeter<'s, S> {
    pub fn new(storage: &'s S) -> Self {
        Self { storage }
    }

    /// Load the persisted count; absent or unparseable values read as 0.
    pub async fn load(&self, session_id: &SessionId) -> u64 {
        match self.storage.get(&token_count_key(session_id)).await {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(session_id = %session_id, value = %raw, "Stored token count is malformed");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Failed to read token count");
                0
            }
        }
    }

    pub async fn persist(&self, session_id: &SessionId, count: u64) -> Result<(), StorageError> {
        self.storage
            .set(&token_count_key(session_id), &count.to_string())
            .await
    }

    /// Store a zero count.
    pub async fn reset(&self, session_id: &SessionId) -> Result<u64, StorageError> {
        self.persist(session_id, 0).await?;
        Ok(0)
    }

    pub fn add_usage(count: u64, delta: u64) -> u64 {
        count.saturating_add(delta)
    }

    /// True once the count has reached the limit.
    pub fn is_exhausted(count: u64, limit: u64) -> bool {
        count >= limit
    }

    pub fn remaining(count: u64, limit: u64) -> u64 {
        limit.saturating_sub(count)
    }
}
