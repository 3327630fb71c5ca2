//! Application state wiring configuration, storage and transport together.
//!
//! Core components are generic over the storage and transport ports;
//! AppState pins them to the concrete infra implementations.

use std::path::{Path, PathBuf};

use anyhow::Context;

use laws_core::chat::TurnOrchestrator;
use laws_core::dispatch::FailoverDispatcher;
use laws_core::documents::DocumentService;
use laws_core::storage::box_storage::BoxSessionStorage;
use laws_infra::config::resolve_client_config;
use laws_infra::filesystem::resolve_data_dir;
use laws_infra::http::ReqwestTransport;
use laws_infra::sqlite::{DatabasePool, SqliteSessionStorage};
use laws_infra::storage::MemorySessionStorage;
use laws_types::config::ClientConfig;

/// Turn orchestrator pinned to the concrete storage and transport.
pub type ChatSession<'a> = TurnOrchestrator<'a, BoxSessionStorage, ReqwestTransport>;

/// Everything a command needs.
pub struct AppState {
    pub config: ClientConfig,
    pub data_dir: PathBuf,
    pub storage: BoxSessionStorage,
    pub dispatcher: FailoverDispatcher<ReqwestTransport>,
}

impl AppState {
    /// Load configuration and open session storage.
    ///
    /// With `session_db`, the session lives in that SQLite file; otherwise it
    /// is kept in memory for the lifetime of the process.
    pub async fn init(session_db: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = resolve_client_config(&data_dir)
            .await
            .context("Invalid configuration")?;

        let storage = match session_db {
            Some(path) => {
                let pool = DatabasePool::open(path)
                    .await
                    .with_context(|| format!("Failed to open session database {}", path.display()))?;
                BoxSessionStorage::new(SqliteSessionStorage::new(pool))
            }
            None => BoxSessionStorage::new(MemorySessionStorage::new()),
        };

        let transport = ReqwestTransport::new()?;

        tracing::debug!(
            data_dir = %data_dir.display(),
            token_limit = config.token_limit,
            "Application state initialized"
        );

        Ok(Self {
            config,
            data_dir,
            storage,
            dispatcher: FailoverDispatcher::new(transport),
        })
    }

    /// Open the chat session, failing when no chat endpoint is configured.
    pub async fn open_session(&self) -> anyhow::Result<ChatSession<'_>> {
        let endpoints = self
            .config
            .chat_endpoints()
            .context("Set LAWS_CHAT_URL or chat_url in config.toml")?;
        Ok(TurnOrchestrator::open(
            &self.storage,
            &self.dispatcher,
            endpoints,
            self.config.token_limit,
        )
        .await)
    }

    pub fn documents(&self) -> DocumentService<'_, ReqwestTransport> {
        DocumentService::new(&self.dispatcher)
    }
}
