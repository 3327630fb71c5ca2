//! In-memory doubles shared by the unit tests of this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use laws_types::error::{StorageError, TransportError};
use laws_types::http::{HttpResponse, RequestPayload};

use crate::dispatch::transport::HttpTransport;
use crate::storage::session_storage::SessionStorage;

/// Session storage backed by a HashMap, with a switch to simulate outages.
pub struct MockStorage {
    values: Mutex<HashMap<String, String>>,
    unavailable: bool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            unavailable: true,
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SessionStorage for MockStorage {
    fn backend(&self) -> &'static str {
        "mock"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Transport returning scripted outcomes per URL and recording every call.
///
/// Each URL has a queue of outcomes; a URL with an empty or missing queue
/// answers with a connection error.
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Result<HttpResponse, TransportError>>>>,
    calls: Mutex<Vec<(String, RequestPayload)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, url: &str, status: u16, body: &str) -> Self {
        self.push(url, Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, url: &str, message: &str) -> Self {
        self.push(url, Err(TransportError::Request(message.to_string())));
        self
    }

    pub fn push(&self, url: &str, outcome: Result<HttpResponse, TransportError>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(outcome);
    }

    pub fn calls(&self) -> Vec<(String, RequestPayload)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == url)
            .count()
    }
}

impl HttpTransport for MockTransport {
    async fn post(
        &self,
        url: &str,
        payload: &RequestPayload,
    ) -> Result<HttpResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        self.scripts
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::Request(format!("no route to {url}"))))
    }
}
