//! Main chat loop.
//!
//! Opens the session, prints the banner and stored transcript, then reads
//! lines until Ctrl+D or `/exit`. Plain lines are submitted to the turn
//! orchestrator; slash commands are handled locally.

use console::style;
use tracing::info;

use laws_core::chat::{Refusal, TurnOutcome, TurnReport, status};
use laws_core::effect::UiEffect;
use laws_core::storage::session_storage::SessionStorage;

use crate::cli::{documents, print_alerts, spinner};
use crate::state::{AppState, ChatSession};

use super::banner::print_welcome_banner;
use super::budget_display::{render_limit_reached, render_usage};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Prompt reflecting whether input is currently accepted.
fn prompt_for(session: &ChatSession<'_>) -> String {
    match session.blocked_by() {
        Some(Refusal::LimitReached) => {
            format!("  {} ", style("Token limit reached, cannot send >").red())
        }
        Some(Refusal::RateLimited) => {
            format!("  {} ", style("Rate limited, /reset --yes to continue >").yellow())
        }
        _ => format!(
            "  {} ",
            style(format!("You [{}] >", session.intent())).green().bold()
        ),
    }
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let mut session = state.open_session().await?;
    let renderer = ChatRenderer::new();

    let secondary = state.config.chat_url_secondary.as_deref();
    print_welcome_banner(
        session.session_id().as_str(),
        state.storage.backend(),
        state.config.chat_url.as_deref().unwrap_or_default(),
        secondary.filter(|s| !s.trim().is_empty()),
    );
    renderer.print_transcript(session.conversation());
    println!("{}", render_usage(session.token_count(), session.token_limit()));
    println!();

    let (mut chat_input, _writer) = ChatInput::new(prompt_for(&session))
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        chat_input.update_prompt(&prompt_for(&session));
        let text = match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Exit => break,
                other => handle_command(state, &mut session, &renderer, &mut chat_input, other).await,
            }
            continue;
        }

        let progress = spinner(status::WAITING);
        let report = session.submit(&text).await;
        progress.finish_and_clear();
        print_report(&renderer, &session, &report);
    }

    println!("\n  {}", style("Session ended.").dim());
    info!(
        session_id = %session.session_id(),
        turns = session.conversation().len(),
        token_count = session.token_count(),
        "Chat loop finished"
    );
    Ok(())
}

/// Print the result of one submission.
fn print_report(renderer: &ChatRenderer, session: &ChatSession<'_>, report: &TurnReport) {
    if let TurnOutcome::Refused(Refusal::EmptyQuery) = report.outcome {
        return;
    }

    println!();
    for effect in &report.effects {
        if *effect == UiEffect::ScrollToLatest {
            if let Some(turn) = session.conversation().last() {
                renderer.print_turn(turn);
            }
        }
    }
    print_alerts(&report.effects);

    if let Some(line) = &report.status {
        let ok = matches!(report.outcome, TurnOutcome::Applied { .. }) && !session.limit_reached();
        let styled = if ok { style(line.as_str()).dim() } else { style(line.as_str()).yellow() };
        println!("  {styled}");
    }
    if session.limit_reached() {
        println!("{}", render_limit_reached(session.token_count(), session.token_limit()));
    } else {
        println!("{}", render_usage(session.token_count(), session.token_limit()));
    }
    println!();
}

async fn handle_command(
    state: &AppState,
    session: &mut ChatSession<'_>,
    renderer: &ChatRenderer,
    chat_input: &mut ChatInput,
    cmd: ChatCommand,
) {
    match cmd {
        ChatCommand::Help => commands::print_help(),
        ChatCommand::Clear => chat_input.clear(),
        ChatCommand::History => {
            println!();
            renderer.print_transcript(session.conversation());
        }
        ChatCommand::Usage => {
            println!();
            println!("{}", render_usage(session.token_count(), session.token_limit()));
            if let Some(line) = session.status() {
                println!("  {}", style(line).dim());
            }
            println!();
        }
        ChatCommand::Intent(None) => {
            println!("\n  Intent: {}\n", style(session.intent()).cyan());
        }
        ChatCommand::Intent(Some(intent)) => {
            session.set_intent(intent);
            println!("\n  Intent set to {}\n", style(session.intent()).cyan());
        }
        ChatCommand::Docs => {
            println!();
            if session.document_ids().is_empty() {
                println!("  {}", style("No documents picked yet.").dim());
            } else {
                println!("  {}", style("Files picked").bold());
                for id in session.document_ids() {
                    println!("  - {id}");
                }
            }
            println!();
        }
        ChatCommand::Reset { confirmed: false } => {
            println!(
                "\n  {} Clear chat history and token count for this session? Run {} to confirm.\n",
                style("!").yellow().bold(),
                style("/reset --yes").cyan()
            );
        }
        ChatCommand::Reset { confirmed: true } => {
            session.reset().await;
            println!("\n  {} {}\n", style("ok").green(), status::SESSION_CLEARED);
        }
        ChatCommand::Upload { category, path } => {
            if let Err(e) = documents::upload_document(state, &path, &category, false).await {
                println!("\n  {} {e:#}\n", style("!").red().bold());
            }
        }
        ChatCommand::ClearCollection { confirmed: false } => {
            println!(
                "\n  {} This removes every uploaded document. Run {} to confirm.\n",
                style("!").yellow().bold(),
                style("/clear-collection --yes").cyan()
            );
        }
        ChatCommand::ClearCollection { confirmed: true } => {
            if let Err(e) = documents::clear_collection(state, true, false).await {
                println!("\n  {} {e:#}\n", style("!").red().bold());
            }
        }
        ChatCommand::InvalidArgs { command, message } => {
            println!(
                "\n  {} {}: {}\n",
                style("!").yellow().bold(),
                style(command).cyan(),
                message
            );
        }
        ChatCommand::Unknown(name) => {
            println!(
                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                style(name).dim()
            );
        }
        ChatCommand::Exit => {}
    }
}
