//! Session storage abstractions.
//!
//! - `SessionStorage`: RPITIT port implemented in laws-infra
//! - `BoxSessionStorage`: object-safe wrapper for runtime backend selection

pub mod box_storage;
pub mod session_storage;
