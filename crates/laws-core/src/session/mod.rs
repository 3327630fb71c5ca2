//! Session identity.

pub mod identity;

pub use identity::{generate_session_id, get_or_create_session_id};
