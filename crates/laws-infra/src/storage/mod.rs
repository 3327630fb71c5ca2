//! Session storage backends.
//!
//! - `MemorySessionStorage`: process-lifetime storage (default)
//! - `SqliteSessionStorage` (in `crate::sqlite`): survives restarts

pub mod memory;

pub use memory::MemorySessionStorage;
