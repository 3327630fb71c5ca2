//! CLI command definitions and dispatch for the `laws` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod documents;
pub mod session;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use laws_core::effect::UiEffect;

/// Chat with a document-grounded answering service.
#[derive(Parser)]
#[command(name = "laws", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "LAWS_OTEL")]
    pub otel: bool,

    /// Keep the session in this SQLite file so it survives restarts.
    /// Without it, the session lasts as long as the process.
    #[arg(long, global = true, env = "LAWS_SESSION_DB")]
    pub session_db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat,

    /// Send a single query and print the answer.
    Ask {
        /// The question to send.
        query: String,

        /// Intent attached to the request (order or act).
        #[arg(long, short)]
        intent: Option<String>,
    },

    /// Upload a reference document.
    Upload {
        /// File to upload.
        file: PathBuf,

        /// Category label for the document.
        #[arg(long, short)]
        category: String,
    },

    /// Remove every uploaded document from the collection.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Inspect or reset the current session.
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Show the session id, usage and stored conversation.
    Show,

    /// Clear the stored conversation and token count.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

/// Start a cyan spinner with a message.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Print a status line, styled by whether it reports success.
pub fn print_status(status: &str, ok: bool) {
    let marker = if ok {
        style("ok").green()
    } else {
        style("!").red().bold()
    };
    println!("  {marker} {status}");
}

/// Print every alert effect as a highlighted notice.
pub fn print_alerts(effects: &[UiEffect]) {
    for effect in effects {
        if let UiEffect::Alert(text) = effect {
            println!();
            println!("  {} {}", style("Server says:").yellow().bold(), text);
        }
    }
}
