//! Session commands: show the stored conversation and usage, reset them.
//!
//! These work directly against session storage and need no chat endpoint,
//! so they are useful with `--session-db` between chat runs.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use laws_core::chat::{ConversationStore, status};
use laws_core::session::get_or_create_session_id;
use laws_core::storage::box_storage::BoxSessionStorage;
use laws_core::storage::session_storage::SessionStorage;
use laws_core::usage::UsageMeter;
use laws_types::chat::MessageRole;

use crate::cli::chat::budget_display::render_usage;
use crate::cli::chat::renderer::EMPTY_CONVERSATION;
use crate::state::AppState;

const PREVIEW_CHARS: usize = 80;

/// Shorten a turn for the table view.
fn preview(content: &str) -> String {
    let single_line = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > PREVIEW_CHARS {
        let cut: String = single_line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        single_line
    }
}

/// Print the session id, token usage, and the stored conversation.
///
/// # Examples
///
/// ```bash
/// laws session show --session-db ~/.laws/session.db
/// laws session show --json
/// ```
pub async fn show_session(state: &AppState, json: bool) -> Result<()> {
    let session_id = get_or_create_session_id(&state.storage).await;
    let conversation = ConversationStore::new(&state.storage).load(&session_id).await;
    let token_count = UsageMeter::new(&state.storage).load(&session_id).await;
    let limit = state.config.token_limit;

    if json {
        let result = serde_json::json!({
            "session_id": session_id,
            "storage": state.storage.backend(),
            "data_dir": state.data_dir.display().to_string(),
            "token_count": token_count,
            "token_limit": limit,
            "remaining": UsageMeter::<BoxSessionStorage>::remaining(token_count, limit),
            "chat_history": conversation,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Session {} ({})",
        style("i").blue().bold(),
        style(&session_id).cyan(),
        style(state.storage.backend()).dim()
    );
    println!("{}", render_usage(token_count, limit));
    println!();

    if conversation.is_empty() {
        println!("  {}", style(EMPTY_CONVERSATION).dim());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Content").fg(Color::White),
    ]);

    for (i, turn) in conversation.iter().enumerate() {
        let role_color = match turn.role {
            MessageRole::User => Color::Green,
            MessageRole::Assistant => Color::Cyan,
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(turn.role.to_string()).fg(role_color),
            Cell::new(preview(&turn.content)),
        ]);
    }

    println!("{table}");
    println!();
    Ok(())
}

/// Clear the stored conversation and token count.
///
/// Prompts for confirmation unless `yes` is set or output is JSON.
pub async fn reset_session(state: &AppState, yes: bool, json: bool) -> Result<()> {
    if !yes && !json {
        let confirmed = Confirm::new()
            .with_prompt("Clear the stored conversation and token count?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let session_id = get_or_create_session_id(&state.storage).await;
    ConversationStore::new(&state.storage)
        .reset(&session_id)
        .await?;
    UsageMeter::new(&state.storage).reset(&session_id).await?;
    tracing::info!(session_id = %session_id, "Session reset from CLI");

    if json {
        println!(
            "{}",
            serde_json::json!({"reset": true, "session_id": session_id})
        );
    } else {
        println!();
        println!("  {} {}", style("ok").green(), status::SESSION_CLEARED);
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_collapses_whitespace() {
        assert_eq!(preview("Section 4\n\n  applies."), "Section 4 applies.");
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let long = "word ".repeat(40);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS);
        assert!(shown.ends_with("..."));
    }
}
