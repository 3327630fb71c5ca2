//! One-shot query: `laws ask "..."`.
//!
//! Runs a single turn through the same orchestrator as the chat loop, so
//! history, usage and rate limiting carry over when `--session-db` is used.

use anyhow::{Result, anyhow};
use console::style;

use laws_core::chat::{TurnOutcome, status};
use laws_types::chat::{Intent, Turn};

use crate::cli::chat::budget_display::render_usage;
use crate::cli::chat::renderer::ChatRenderer;
use crate::cli::{print_alerts, spinner};
use crate::state::AppState;

/// Send `query` and print the answer. Returns whether the turn was applied.
///
/// # Examples
///
/// ```bash
/// laws ask "Can my landlord keep the deposit?" --intent act
/// ```
pub async fn ask(state: &AppState, query: &str, intent: Option<&str>, json: bool) -> Result<bool> {
    let intent = intent
        .map(str::parse::<Intent>)
        .transpose()
        .map_err(|e| anyhow!("{e}"))?;

    let mut session = state.open_session().await?;
    if let Some(intent) = intent {
        session.set_intent(intent);
    }

    let progress = (!json).then(|| spinner(status::WAITING));
    let report = session.submit(query).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let applied = matches!(report.outcome, TurnOutcome::Applied { .. });
    let answer = if applied {
        session.conversation().last().map(|turn| turn.content.clone())
    } else {
        None
    };

    if json {
        let (tokens_used, error) = match &report.outcome {
            TurnOutcome::Applied { tokens_used } => (Some(*tokens_used), None),
            TurnOutcome::Failed(e) => (None, Some(e.to_string())),
            TurnOutcome::Refused(refusal) => (None, Some(format!("{refusal:?}"))),
        };
        let result = serde_json::json!({
            "session_id": session.session_id(),
            "ok": applied,
            "answer": answer,
            "intent": session.intent(),
            "document_ids": session.document_ids(),
            "tokens_used": tokens_used,
            "token_count": session.token_count(),
            "remaining": session.remaining(),
            "status": report.status,
            "error": error,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(applied);
    }

    println!();
    if let Some(answer) = answer {
        ChatRenderer::new().print_turn(&Turn::assistant(answer));
    }
    print_alerts(&report.effects);
    if let Some(line) = &report.status {
        let styled = if applied { style(line.as_str()).dim() } else { style(line.as_str()).yellow() };
        println!("  {styled}");
    }
    if !session.document_ids().is_empty() {
        println!(
            "  {} {}",
            style("Files picked:").bold(),
            session.document_ids().join(", ")
        );
    }
    println!("{}", render_usage(session.token_count(), session.token_limit()));
    println!();
    Ok(applied)
}
