//! Session identity provider.
//!
//! A session id is created on first access and stored under the fixed
//! [`SESSION_ID_KEY`]. Every later call in the same session returns it.

use laws_types::session::SessionId;
use uuid::Uuid;

use crate::storage::session_storage::{SESSION_ID_KEY, SessionStorage};

/// Length of a generated session id.
pub const SESSION_ID_LEN: usize = 8;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh random session id (8 base-36 characters, `[0-9a-z]`).
///
/// Digits are taken from the low bits of a v4 UUID, which are all random.
pub fn generate_session_id() -> SessionId {
    let mut bits = Uuid::new_v4().as_u128();
    let id: String = (0..SESSION_ID_LEN)
        .map(|_| {
            let digit = ALPHABET[(bits % 36) as usize] as char;
            bits /= 36;
            digit
        })
        .collect();
    SessionId::new(id)
}

/// Return the session id stored in `storage`, creating and persisting one if
/// none exists.
///
/// Storage failures never surface: a fresh id is returned and the session
/// simply does not survive a restart.
pub async fn get_or_create_session_id<S: SessionStorage>(storage: &S) -> SessionId {
    match storage.get(SESSION_ID_KEY).await {
        Ok(Some(existing)) if !existing.trim().is_empty() => {
            return SessionId::new(existing.trim());
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Session storage unreadable, using an ephemeral session id");
            return generate_session_id();
        }
    }

    let id = generate_session_id();
    if let Err(e) = storage.set(SESSION_ID_KEY, id.as_str()).await {
        tracing::warn!(error = %e, session_id = %id, "Failed to persist session id");
    } else {
        tracing::debug!(session_id = %id, backend = storage.backend(), "Created session id");
    }
    id
}
