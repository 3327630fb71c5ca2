//! Chat endpoint wire format.
//!
//! Requests are `{ query, chat_history, intent }`. Successful replies are a
//! positional JSON array `[answer, tokens_used, intent, document_ids]`, which
//! is decoded into the named [`ChatReply`] with its shape validated.

use serde::Serialize;
use serde_json::Value;

use crate::chat::{Intent, Turn};
use crate::error::DecodeError;

/// Body of a chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub query: String,
    pub chat_history: Vec<Turn>,
    pub intent: Intent,
}

/// Decoded successful chat reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Assistant text; empty when the backend sent `null`.
    pub answer: String,
    /// Tokens charged for this exchange; 0 when missing or not a number.
    pub tokens_used: u64,
    /// Intent the backend wants the next request to carry.
    pub intent: Intent,
    /// Documents the backend considers relevant to the conversation.
    pub document_ids: Vec<String>,
}

impl ChatReply {
    /// Decode a reply body.
    pub fn from_json(body: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| DecodeError::Json(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Decode an already parsed reply.
    ///
    /// The array must have at least four elements. `answer` may be a string or
    /// null, `tokens_used` degrades to 0, `intent` must be a string and
    /// `document_ids` an array of strings or numbers.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let items = value.as_array().ok_or(DecodeError::NotAnArray)?;
        if items.len() < 4 {
            return Err(DecodeError::TooShort { len: items.len() });
        }

        let answer = match &items[0] {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            _ => {
                return Err(DecodeError::WrongType {
                    index: 0,
                    field: "answer",
                    expected: "string or null",
                });
            }
        };

        let tokens_used = parse_token_delta(&items[1]);

        let intent = items[2]
            .as_str()
            .map(Intent::new)
            .ok_or(DecodeError::WrongType {
                index: 2,
                field: "intent",
                expected: "string",
            })?;

        let ids_wrong_type = DecodeError::WrongType {
            index: 3,
            field: "document_ids",
            expected: "array of strings",
        };
        let document_ids = items[3]
            .as_array()
            .ok_or_else(|| ids_wrong_type.clone())?
            .iter()
            .map(|id| match id {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(ids_wrong_type.clone()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            answer,
            tokens_used,
            intent,
            document_ids,
        })
    }
}

/// Interpret the token element of a reply. Non-numeric, negative or missing
/// values count as 0; fractional values are truncated.
fn parse_token_delta(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| f as u64)
            .unwrap_or(0),
        _ => 0,
    }
}

/// Extract the human-readable message from an error body.
///
/// Handles a bare JSON string (`"File too large"`), an object with a
/// `detail` field (`{"detail": "slow down"}`), and falls back to the raw text.
pub fn server_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}
