//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for intent,
//! documents, usage and the session itself.

use std::path::PathBuf;

use console::style;
use laws_types::chat::Intent;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Show the stored conversation.
    History,
    /// Show token usage and the current status.
    Usage,
    /// Show (None) or set the intent.
    Intent(Option<Intent>),
    /// List the documents attached to the conversation.
    Docs,
    /// Clear conversation, usage, intent and documents; requires `--yes`.
    Reset { confirmed: bool },
    /// Upload a document under a category.
    Upload { category: String, path: PathBuf },
    /// Clear the document collection; requires `--yes`.
    ClearCollection { confirmed: bool },
    /// Known command with arguments it cannot use.
    InvalidArgs { command: &'static str, message: String },
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts
        .get(1)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    Some(match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/history" => ChatCommand::History,
        "/usage" | "/status" => ChatCommand::Usage,
        "/docs" => ChatCommand::Docs,
        "/reset" => ChatCommand::Reset {
            confirmed: confirmed(arg),
        },
        "/intent" => match arg {
            None => ChatCommand::Intent(None),
            Some(tag) => match tag.parse::<Intent>() {
                Ok(intent) => ChatCommand::Intent(Some(intent)),
                Err(message) => ChatCommand::InvalidArgs {
                    command: "/intent",
                    message,
                },
            },
        },
        "/upload" => match arg.and_then(|a| a.split_once(char::is_whitespace)) {
            Some((category, path)) if !path.trim().is_empty() => ChatCommand::Upload {
                category: category.to_string(),
                path: PathBuf::from(path.trim()),
            },
            _ => ChatCommand::InvalidArgs {
                command: "/upload",
                message: "expected <category> <path>".to_string(),
            },
        },
        "/clear-collection" => ChatCommand::ClearCollection {
            confirmed: confirmed(arg),
        },
        other => ChatCommand::Unknown(other.to_string()),
    })
}

fn confirmed(arg: Option<&str>) -> bool {
    matches!(arg, Some("--yes") | Some("yes"))
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let intent_usage = format!("/intent [{}]", Intent::selectable().join("|"));
    let rows = [
        ("/help", "Show this help message"),
        (intent_usage.as_str(), "Show or set the request intent"),
        ("/docs", "List documents attached to the conversation"),
        ("/usage", "Show tokens used and remaining"),
        ("/history", "Show the stored conversation"),
        ("/upload <category> <path>", "Upload a reference document"),
        ("/clear-collection --yes", "Remove every uploaded document"),
        ("/reset --yes", "Clear conversation, usage and intent"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat session"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, description) in rows {
        println!("  {:<28} {}", style(cmd).cyan(), description);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
