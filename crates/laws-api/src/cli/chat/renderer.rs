//! Terminal markdown rendering for assistant turns.
//!
//! Assistant answers arrive as markdown; `ChatRenderer` formats them with
//! `termimad`. User turns are printed verbatim.

use console::style;
use termimad::MadSkin;

use laws_types::chat::{ConversationLog, MessageRole, Turn};

/// Placeholder shown when the conversation is empty.
pub const EMPTY_CONVERSATION: &str = "No messages yet.";

/// Terminal markdown renderer.
pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);
        Self { skin }
    }

    /// Render markdown to an ANSI string.
    pub fn render_markdown(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Print one turn with its role label.
    pub fn print_turn(&self, turn: &Turn) {
        match turn.role {
            MessageRole::User => {
                println!("  {} {}", style("You >").green().bold(), turn.content);
            }
            MessageRole::Assistant => {
                println!("  {}", style("Assistant").cyan().bold());
                if turn.content.is_empty() {
                    println!("  {}", style("(empty answer)").dim());
                } else {
                    for line in self.render_markdown(&turn.content).lines() {
                        println!("  {line}");
                    }
                }
            }
        }
        println!();
    }

    /// Print the whole conversation, or the empty placeholder.
    pub fn print_transcript(&self, log: &ConversationLog) {
        if log.is_empty() {
            println!("  {}", style(EMPTY_CONVERSATION).dim());
            println!();
            return;
        }
        for turn in log.iter() {
            self.print_turn(turn);
        }
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}
