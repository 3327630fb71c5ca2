//! Client configuration types.
//!
//! `ClientConfig` holds the backend endpoints and the session token limit.
//! It is read from `config.toml` in the data directory and overridden by
//! environment variables (see `laws-infra::config`).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Token limit applied when none is configured.
pub const DEFAULT_TOKEN_LIMIT: u64 = 100_000;

/// Top-level configuration for the chat client. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Primary document upload endpoint.
    #[serde(default)]
    pub upload_url: Option<String>,

    /// Upload endpoint tried once when the primary answers 503.
    #[serde(default)]
    pub upload_url_secondary: Option<String>,

    /// Primary chat endpoint.
    #[serde(default)]
    pub chat_url: Option<String>,

    /// Chat endpoint tried once when the primary answers 503.
    #[serde(default)]
    pub chat_url_secondary: Option<String>,

    /// Endpoint that clears the uploaded document collection.
    #[serde(default)]
    pub delete_url: Option<String>,

    /// Cumulative tokens a session may consume before queries are blocked.
    #[serde(default = "default_token_limit")]
    pub token_limit: u64,
}

fn default_token_limit() -> u64 {
    DEFAULT_TOKEN_LIMIT
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            upload_url: None,
            upload_url_secondary: None,
            chat_url: None,
            chat_url_secondary: None,
            delete_url: None,
            token_limit: default_token_limit(),
        }
    }
}

/// A primary endpoint plus the optional fallback used on overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailoverEndpoints {
    pub primary: String,
    pub secondary: Option<String>,
}

impl FailoverEndpoints {
    pub fn new(primary: impl Into<String>, secondary: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary,
        }
    }
}

impl ClientConfig {
    /// Chat endpoints, failing when no primary chat URL is configured.
    pub fn chat_endpoints(&self) -> Result<FailoverEndpoints, ConfigError> {
        let primary = non_empty(&self.chat_url).ok_or(ConfigError::Missing("chat_url"))?;
        Ok(FailoverEndpoints::new(
            primary,
            non_empty(&self.chat_url_secondary),
        ))
    }

    /// Upload endpoints, failing when no primary upload URL is configured.
    pub fn upload_endpoints(&self) -> Result<FailoverEndpoints, ConfigError> {
        let primary = non_empty(&self.upload_url).ok_or(ConfigError::Missing("upload_url"))?;
        Ok(FailoverEndpoints::new(
            primary,
            non_empty(&self.upload_url_secondary),
        ))
    }

    /// Delete/clear endpoint.
    pub fn delete_url(&self) -> Result<String, ConfigError> {
        non_empty(&self.delete_url).ok_or(ConfigError::Missing("delete_url"))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
