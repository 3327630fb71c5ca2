//! Conversation types: turns, the bounded conversation log, and intents.
//!
//! The conversation log is the sliding window of the most recent turns that
//! is both persisted for the session and sent to the backend as context.

use serde::{Deserialize, Serialize};

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Maximum number of turns retained in a conversation log.
pub const MAX_CONVERSATION_TURNS: usize = 10;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: MessageRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered log of the most recent turns, capped at [`MAX_CONVERSATION_TURNS`].
///
/// Appending past the cap evicts the oldest turns first, so the newest turns
/// are always retained. Serializes as a plain JSON array of turns; a longer
/// array is truncated to its tail when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct ConversationLog {
    turns: VecDeque<Turn>,
}

impl ConversationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new log with `turn` appended and the window re-applied.
    pub fn with_turn(mut self, turn: Turn) -> Self {
        self.push(turn);
        self
    }

    /// Append a turn in place. Returns the number of evicted turns.
    pub fn push(&mut self, turn: Turn) -> usize {
        self.turns.push_back(turn);
        self.enforce_window()
    }

    fn enforce_window(&mut self) -> usize {
        let mut evicted = 0;
        while self.turns.len() > MAX_CONVERSATION_TURNS {
            self.turns.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    /// Copy the turns out in conversation order.
    pub fn to_vec(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }
}

impl From<Vec<Turn>> for ConversationLog {
    fn from(turns: Vec<Turn>) -> Self {
        let mut log = Self {
            turns: turns.into(),
        };
        log.enforce_window();
        log
    }
}

impl From<ConversationLog> for Vec<Turn> {
    fn from(log: ConversationLog) -> Self {
        log.turns.into()
    }
}

/// Routing tag attached to every chat request.
///
/// The backend understands `"order"` and `"act"`, and may hand back any tag
/// in its reply, so the value is kept as an open string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intent(String);

impl Intent {
    pub const ORDER: &'static str = "order";
    pub const ACT: &'static str = "act";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn order() -> Self {
        Self::new(Self::ORDER)
    }

    pub fn act() -> Self {
        Self::new(Self::ACT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tags a user can pick from the intent selector.
    pub fn selectable() -> [&'static str; 2] {
        [Self::ORDER, Self::ACT]
    }
}

impl Default for Intent {
    fn default() -> Self {
        Self::order()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Intent {
    type Err = String;

    /// Parse a user-selected intent; only the selectable tags are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            Self::ORDER => Ok(Self::order()),
            Self::ACT => Ok(Self::act()),
            other => Err(format!(
                "invalid intent: '{other}' (expected one of: {})",
                Self::selectable().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<Turn> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("q{i}"))
                } else {
                    Turn::assistant(format!("a{i}"))
                }
            })
            .collect()
    }

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_turn_serializes_with_lowercase_role() {
        let json = serde_json::to_string(&Turn::user("hello")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);
    }

    #[test]
    fn test_log_never_exceeds_cap_and_keeps_newest() {
        let mut log = ConversationLog::new();
        let all = numbered(37);
        for (i, turn) in all.iter().enumerate() {
            log.push(turn.clone());
            assert!(log.len() <= MAX_CONVERSATION_TURNS);
            assert_eq!(log.last(), Some(turn));
            assert_eq!(log.len(), (i + 1).min(MAX_CONVERSATION_TURNS));
        }
        assert_eq!(log.to_vec(), all[27..].to_vec());
    }

    #[test]
    fn test_push_reports_evictions() {
        let mut log: ConversationLog = numbered(10).into();
        assert_eq!(log.push(Turn::user("x")), 1);
        assert_eq!(log.iter().next().unwrap().content, "a1");
    }

    #[test]
    fn test_with_turn_leaves_input_untouched() {
        let log: ConversationLog = numbered(3).into();
        let next = log.clone().with_turn(Turn::user("new"));
        assert_eq!(log.len(), 3);
        assert_eq!(next.len(), 4);
    }

    #[test]
    fn test_log_json_is_plain_array() {
        let log: ConversationLog = numbered(2).into();
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(
            json,
            r#"[{"role":"user","content":"q0"},{"role":"assistant","content":"a1"}]"#
        );
        let parsed: ConversationLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, log);
    }

    #[test]
    fn test_oversized_array_is_truncated_to_tail() {
        let json = serde_json::to_string(&numbered(14)).unwrap();
        let parsed: ConversationLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), MAX_CONVERSATION_TURNS);
        assert_eq!(parsed.iter().next().unwrap().content, "q4");
    }

    #[test]
    fn test_intent_default_and_parse() {
        assert_eq!(Intent::default().as_str(), "order");
        assert_eq!(" ACT ".parse::<Intent>().unwrap(), Intent::act());
        assert!("browse".parse::<Intent>().is_err());
    }

    #[test]
    fn test_intent_parse_error_lists_choices() {
        let err = "browse".parse::<Intent>().unwrap_err();
        assert_eq!(err, "invalid intent: 'browse' (expected one of: order, act)");
    }

    #[test]
    fn test_intent_serde_is_transparent() {
        let json = serde_json::to_string(&Intent::act()).unwrap();
        assert_eq!(json, "\"act\"");
        let server_tag: Intent = serde_json::from_str("\"triage\"").unwrap();
        assert_eq!(server_tag.as_str(), "triage");
    }
}
