//! Token budget display for the chat loop.
//!
//! Counters turn yellow at 80% of the limit and red once it is reached.

use console::style;

use laws_core::chat::status;

/// Format a token count with thousands separators: `12450` -> `12,450`.
pub fn format_tokens_human(tokens: u64) -> String {
    let digits = tokens.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render the usage line, e.g. `  Tokens used: 5 • Remaining: 99995`.
pub fn render_usage(used: u64, limit: u64) -> String {
    let remaining = limit.saturating_sub(used);
    let text = format!("  {}", status::usage_summary(used, remaining));

    if used >= limit {
        format!("{}", style(text).red())
    } else if used.saturating_mul(10) >= limit.saturating_mul(8) {
        format!("{}", style(text).yellow())
    } else {
        format!("{}", style(text).dim())
    }
}

/// Render the exhaustion notice shown when input is disabled.
pub fn render_limit_reached(used: u64, limit: u64) -> String {
    format!(
        "  {} {}",
        style("!").red().bold(),
        style(format!(
            "Token limit reached: {} / {} tokens. Use /reset to start over.",
            format_tokens_human(used),
            format_tokens_human(limit),
        ))
        .red(),
    )
}
