//! Conversation store: the bounded, session-scoped turn log.
//!
//! Writes go through to session storage as a JSON array of turns under
//! `chat_history_{session_id}`. Reads never fail; anything that cannot be
//! loaded is treated as an empty conversation.

use laws_types::chat::{ConversationLog, Turn};
use laws_types::error::StorageError;
use laws_types::session::SessionId;

use crate::storage::session_storage::{SessionStorage, chat_history_key};

/// Loads and persists the conversation log of a session.
pub struct ConversationStore<'s, S: SessionStorage> {
    storage: &'s S,
}

impl<'s, S: SessionStorage> ConversationStore<'s, S> {
    pub fn new(storage: &'s S) -> Self {
        Self { storage }
    }

    /// Load the persisted log. Missing, unparseable, or unreachable data
    /// yields an empty log; an oversized log keeps its newest turns.
    pub async fn load(&self, session_id: &SessionId) -> ConversationLog {
        let key = chat_history_key(session_id);
        let raw = match self.storage.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return ConversationLog::new(),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Failed to read conversation");
                return ConversationLog::new();
            }
        };

        match serde_json::from_str::<ConversationLog>(&raw) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Stored conversation is malformed, starting empty"
                );
                ConversationLog::new()
            }
        }
    }

    /// Append `turn` and re-apply the window. Pure; does not persist.
    pub fn append(log: ConversationLog, turn: Turn) -> ConversationLog {
        log.with_turn(turn)
    }

    /// Write the log through to storage.
    pub async fn persist(
        &self,
        session_id: &SessionId,
        log: &ConversationLog,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(log)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(&chat_history_key(session_id), &json).await
    }

    /// Replace the stored log with an empty one.
    pub async fn reset(&self, session_id: &SessionId) -> Result<ConversationLog, StorageError> {
        let log = ConversationLog::new();
        self.persist(session_id, &log).await?;
        Ok(log)
    }
}
