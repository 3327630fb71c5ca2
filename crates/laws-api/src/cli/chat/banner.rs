//! Welcome banner display for chat sessions.

use console::style;

/// Print the banner shown when a chat session starts.
pub fn print_welcome_banner(
    session_id: &str,
    storage_backend: &str,
    chat_url: &str,
    failover: Option<&str>,
) {
    println!();
    println!("  {} {}", "*", style("laws chat").cyan().bold());
    println!();
    println!("  {}  {}", style("Session:").bold(), style(session_id).dim());
    println!("  {}  {}", style("Storage:").bold(), style(storage_backend).dim());
    println!("  {}  {}", style("Backend:").bold(), style(chat_url).dim());
    if let Some(secondary) = failover {
        println!("  {} {}", style("Failover:").bold(), style(secondary).dim());
    }
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
