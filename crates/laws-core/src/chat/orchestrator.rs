//! Turn orchestrator: drives one query submission end to end.
//!
//! Each submission moves `Idle -> Sending -> {Applied | Failed} -> Idle`.
//! The user's turn is appended and persisted before dispatch and is kept
//! even when the exchange fails. The return to `Idle` is tied to a drop
//! guard so the sending indicator is released on every path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use laws_types::chat::{ConversationLog, Intent, Turn};
use laws_types::config::FailoverEndpoints;
use laws_types::error::{DispatchError, TransportError};
use laws_types::http::RequestPayload;
use laws_types::session::SessionId;
use laws_types::wire::{ChatReply, ChatRequest};

use super::conversation::ConversationStore;
use super::status;
use crate::dispatch::{FailoverDispatcher, HttpTransport};
use crate::effect::UiEffect;
use crate::session::get_or_create_session_id;
use crate::storage::session_storage::SessionStorage;
use crate::usage::UsageMeter;

/// Where the orchestrator is in its submission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sending,
}

/// Why a submission was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    EmptyQuery,
    LimitReached,
    RateLimited,
    InFlight,
}

/// Result of one submission.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The reply was decoded and applied to the session.
    Applied { tokens_used: u64 },
    /// The exchange failed; only the user turn was recorded.
    Failed(DispatchError),
    /// Nothing was sent and no state changed.
    Refused(Refusal),
}

/// What the front end needs after a submission.
#[derive(Debug)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    /// New status line, if the submission changed it.
    pub status: Option<String>,
    pub effects: Vec<UiEffect>,
}

impl TurnReport {
    fn refused(refusal: Refusal, status: Option<String>) -> Self {
        Self {
            outcome: TurnOutcome::Refused(refusal),
            status,
            effects: Vec::new(),
        }
    }
}

/// Clears the in-flight flag when dropped.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    /// Set the flag, or return `None` if a submission already holds it.
    fn engage(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(Arc::clone(flag)))
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the session scope: conversation, usage, intent and document context.
pub struct TurnOrchestrator<'a, S: SessionStorage, T: HttpTransport> {
    storage: &'a S,
    dispatcher: &'a FailoverDispatcher<T>,
    endpoints: FailoverEndpoints,
    token_limit: u64,
    session_id: SessionId,
    conversation: ConversationLog,
    token_count: u64,
    intent: Intent,
    document_ids: Vec<String>,
    rate_limited: bool,
    in_flight: Arc<AtomicBool>,
    status: Option<String>,
}

impl<'a, S: SessionStorage, T: HttpTransport> TurnOrchestrator<'a, S, T> {
    /// Recover (or create) the session and its persisted state.
    pub async fn open(
        storage: &'a S,
        dispatcher: &'a FailoverDispatcher<T>,
        endpoints: FailoverEndpoints,
        token_limit: u64,
    ) -> Self {
        let session_id = get_or_create_session_id(storage).await;
        let conversation = ConversationStore::new(storage).load(&session_id).await;
        let token_count = UsageMeter::new(storage).load(&session_id).await;

        tracing::info!(
            session_id = %session_id,
            turns = conversation.len(),
            token_count,
            token_limit,
            backend = storage.backend(),
            "Session opened"
        );

        Self {
            storage,
            dispatcher,
            endpoints,
            token_limit,
            session_id,
            conversation,
            token_count,
            intent: Intent::default(),
            document_ids: Vec::new(),
            rate_limited: false,
            in_flight: Arc::new(AtomicBool::new(false)),
            status: None,
        }
    }

    /// Submit a query.
    ///
    /// Blank queries are ignored. A query is refused without touching any
    /// state when the budget is exhausted, the session is rate-limited, or
    /// another submission is in flight.
    pub async fn submit(&mut self, query: &str) -> TurnReport {
        if query.trim().is_empty() {
            return TurnReport::refused(Refusal::EmptyQuery, None);
        }
        if UsageMeter::<S>::is_exhausted(self.token_count, self.token_limit) {
            return self.refuse(Refusal::LimitReached, status::LIMIT_REFUSED);
        }
        if self.rate_limited {
            return self.refuse(Refusal::RateLimited, status::RATE_LIMITED);
        }
        let Some(_guard) = InFlightGuard::engage(&self.in_flight) else {
            return TurnReport::refused(Refusal::InFlight, None);
        };

        self.conversation = ConversationStore::<S>::append(
            std::mem::take(&mut self.conversation),
            Turn::user(query),
        );
        self.persist_conversation().await;
        self.status = Some(status::WAITING.to_string());

        let request = ChatRequest {
            query: query.to_string(),
            chat_history: self.conversation.to_vec(),
            intent: self.intent.clone(),
        };

        match self.exchange(&request).await {
            Ok(reply) => self.apply(reply).await,
            Err(error) => self.fail(error),
        }
    }

    async fn exchange(&self, request: &ChatRequest) -> Result<ChatReply, DispatchError> {
        let payload = RequestPayload::json(request)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        let result = self.dispatcher.send_to(&self.endpoints, &payload).await?;
        if result.failed_over() {
            tracing::info!(session_id = %self.session_id, "Reply served by secondary chat endpoint");
        }
        Ok(ChatReply::from_json(&result.response.body)?)
    }

    async fn apply(&mut self, reply: ChatReply) -> TurnReport {
        let ChatReply {
            answer,
            tokens_used,
            intent,
            document_ids,
        } = reply;

        self.conversation = ConversationStore::<S>::append(
            std::mem::take(&mut self.conversation),
            Turn::assistant(answer),
        );
        self.persist_conversation().await;

        self.token_count = UsageMeter::<S>::add_usage(self.token_count, tokens_used);
        if let Err(e) = UsageMeter::new(self.storage)
            .persist(&self.session_id, self.token_count)
            .await
        {
            tracing::warn!(session_id = %self.session_id, error = %e, "Failed to persist token count");
        }

        self.intent = intent;
        self.document_ids = document_ids;

        let status = if UsageMeter::<S>::is_exhausted(self.token_count, self.token_limit) {
            tracing::warn!(
                session_id = %self.session_id,
                token_count = self.token_count,
                token_limit = self.token_limit,
                "Token limit reached"
            );
            status::limit_reached(self.token_limit)
        } else {
            status::response_received(tokens_used)
        };
        tracing::debug!(
            session_id = %self.session_id,
            tokens_used,
            token_count = self.token_count,
            intent = %self.intent,
            documents = self.document_ids.len(),
            "Reply applied"
        );
        self.status = Some(status.clone());

        TurnReport {
            outcome: TurnOutcome::Applied { tokens_used },
            status: Some(status),
            effects: vec![UiEffect::ClearInput, UiEffect::ScrollToLatest],
        }
    }

    fn fail(&mut self, error: DispatchError) -> TurnReport {
        tracing::warn!(session_id = %self.session_id, error = %error, "Chat request failed");

        if error.is_blocking() {
            self.rate_limited = true;
        }
        let mut effects = Vec::new();
        if let DispatchError::RateLimited { detail } = &error {
            effects.push(UiEffect::Alert(detail.clone()));
        }

        let status = status::request_failed(&error);
        self.status = Some(status.clone());
        TurnReport {
            outcome: TurnOutcome::Failed(error),
            status: Some(status),
            effects,
        }
    }

    fn refuse(&mut self, refusal: Refusal, message: &str) -> TurnReport {
        self.status = Some(message.to_string());
        TurnReport::refused(refusal, Some(message.to_string()))
    }

    async fn persist_conversation(&self) {
        if let Err(e) = ConversationStore::new(self.storage)
            .persist(&self.session_id, &self.conversation)
            .await
        {
            tracing::warn!(session_id = %self.session_id, error = %e, "Failed to persist conversation");
        }
    }

    /// Replace the intent sent with the next request.
    pub fn set_intent(&mut self, intent: Intent) {
        tracing::debug!(session_id = %self.session_id, intent = %intent, "Intent selected");
        self.intent = intent;
    }

    /// Clear conversation and usage, and restore the default intent.
    ///
    /// Also lifts the rate-limit block and forgets the document context.
    pub async fn reset(&mut self) {
        self.conversation = match ConversationStore::new(self.storage)
            .reset(&self.session_id)
            .await
        {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "Failed to clear stored conversation");
                ConversationLog::new()
            }
        };
        self.token_count = match UsageMeter::new(self.storage).reset(&self.session_id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "Failed to clear stored token count");
                0
            }
        };
        self.intent = Intent::default();
        self.document_ids.clear();
        self.rate_limited = false;
        self.status = Some(status::SESSION_CLEARED.to_string());
        tracing::info!(session_id = %self.session_id, "Session reset");
    }

    pub fn phase(&self) -> TurnPhase {
        if self.in_flight.load(Ordering::Acquire) {
            TurnPhase::Sending
        } else {
            TurnPhase::Idle
        }
    }

    /// Shared handle on the in-flight flag, for spinners and the like.
    pub fn sending_indicator(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.in_flight)
    }

    /// Reason a submission would currently be refused, ignoring query text.
    pub fn blocked_by(&self) -> Option<Refusal> {
        if self.phase() == TurnPhase::Sending {
            Some(Refusal::InFlight)
        } else if self.limit_reached() {
            Some(Refusal::LimitReached)
        } else if self.rate_limited {
            Some(Refusal::RateLimited)
        } else {
            None
        }
    }

    pub fn input_enabled(&self) -> bool {
        self.blocked_by().is_none()
    }

    pub fn limit_reached(&self) -> bool {
        UsageMeter::<S>::is_exhausted(self.token_count, self.token_limit)
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    pub fn token_limit(&self) -> u64 {
        self.token_limit
    }

    pub fn remaining(&self) -> u64 {
        UsageMeter::<S>::remaining(self.token_count, self.token_limit)
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn document_ids(&self) -> &[String] {
        &self.document_ids
    }

    pub fn is_rate_limited(&self) -> bool {
        self.rate_limited
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
