//! User-facing status lines.

pub const WAITING: &str = "Waiting for response...";
pub const LIMIT_REFUSED: &str = "Token limit reached. You cannot send more queries.";
pub const RATE_LIMITED: &str = "Too many requests. Reset the session to continue.";
pub const SESSION_CLEARED: &str = "Session cleared.";

pub const UPLOADING: &str = "Uploading...";
pub const UPLOAD_OK: &str = "Upload successful.";
pub const UPLOAD_FAILED: &str = "Upload failed.";
pub const MISSING_CATEGORY: &str = "Please enter a category.";
pub const MISSING_FILE: &str = "Please choose a file first.";
pub const DELETE_OK: &str = "Delete successful.";
pub const DELETE_FAILED: &str = "Delete failed.";

pub fn response_received(tokens_used: u64) -> String {
    format!("Response received. Tokens used: {tokens_used}")
}

pub fn limit_reached(limit: u64) -> String {
    format!("Token limit reached (>= {limit}). Further queries blocked.")
}

pub fn request_failed(error: impl std::fmt::Display) -> String {
    format!("Error getting response: {error}")
}

/// "Tokens used: X • Remaining: Y"
pub fn usage_summary(used: u64, remaining: u64) -> String {
    format!("Tokens used: {used} \u{2022} Remaining: {remaining}")
}
