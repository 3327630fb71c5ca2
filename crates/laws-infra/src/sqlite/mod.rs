//! SQLite storage layer.
//!
//! Session storage backed by SQLite with WAL mode and split read/write
//! connection pools.

pub mod pool;
pub mod session_storage;

pub use pool::DatabasePool;
pub use session_storage::SqliteSessionStorage;
