//! BoxSessionStorage -- object-safe dynamic dispatch wrapper for SessionStorage.
//!
//! Same blanket-impl pattern as the other boxed ports:
//! 1. Define an object-safe `SessionStorageDyn` trait with boxed futures
//! 2. Blanket-impl `SessionStorageDyn` for all `T: SessionStorage`
//! 3. `BoxSessionStorage` wraps `Box<dyn SessionStorageDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use laws_types::error::StorageError;

use super::session_storage::SessionStorage;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`SessionStorage`] with boxed futures.
pub trait SessionStorageDyn: Send + Sync {
    fn backend(&self) -> &'static str;

    fn get_boxed<'a>(&'a self, key: &'a str)
    -> BoxFuture<'a, Result<Option<String>, StorageError>>;

    fn set_boxed<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    fn remove_boxed<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>>;
}

/// Blanket implementation: any `SessionStorage` automatically implements `SessionStorageDyn`.
impl<T: SessionStorage> SessionStorageDyn for T {
    fn backend(&self) -> &'static str {
        SessionStorage::backend(self)
    }

    fn get_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(self.get(key))
    }

    fn set_boxed<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(self.set(key, value))
    }

    fn remove_boxed<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(self.remove(key))
    }
}

/// Type-erased session storage for runtime backend selection
/// (in-memory for a single run, SQLite to survive restarts).
pub struct BoxSessionStorage {
    inner: Box<dyn SessionStorageDyn>,
}

impl BoxSessionStorage {
    /// Wrap a concrete `SessionStorage` in a type-erased box.
    pub fn new<T: SessionStorage + 'static>(storage: T) -> Self {
        Self {
            inner: Box::new(storage),
        }
    }
}

impl SessionStorage for BoxSessionStorage {
    fn backend(&self) -> &'static str {
        self.inner.backend()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_boxed(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_boxed(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_boxed(key).await
    }
}
