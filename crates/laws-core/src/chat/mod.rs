//! Chat session logic: conversation persistence and turn orchestration.

pub mod conversation;
pub mod orchestrator;
pub mod status;

pub use conversation::ConversationStore;
pub use orchestrator::{Refusal, TurnOrchestrator, TurnOutcome, TurnPhase, TurnReport};
