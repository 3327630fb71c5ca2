//! laws: terminal chat client for a document-grounded answering service.
//!
//! Parses CLI arguments, sets up tracing, loads configuration and session
//! storage, then dispatches to the command handler.

mod cli;
mod state;

use std::process::ExitCode;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, SessionCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,laws=debug,laws_core=debug,laws_infra=debug",
        _ => "trace",
    };
    // Flushes OTel spans when main returns, including through `?`
    let _tracing = laws_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "laws", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let state = AppState::init(cli.session_db.as_deref()).await?;

    let ok = match cli.command {
        Commands::Chat => {
            cli::chat::loop_runner::run_chat_loop(&state).await?;
            true
        }
        Commands::Ask { query, intent } => {
            cli::ask::ask(&state, &query, intent.as_deref(), cli.json).await?
        }
        Commands::Upload { file, category } => {
            cli::documents::upload_document(&state, &file, &category, cli.json).await?
        }
        Commands::Clear { yes } => cli::documents::clear_collection(&state, yes, cli.json).await?,
        Commands::Session { action } => {
            match action {
                SessionCommand::Show => cli::session::show_session(&state, cli.json).await?,
                SessionCommand::Reset { yes } => {
                    cli::session::reset_session(&state, yes, cli.json).await?
                }
            }
            true
        }
        Commands::Completions { .. } => true,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
