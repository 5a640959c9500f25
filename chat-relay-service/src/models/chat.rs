use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

/// One prior turn supplied by the caller. The server never stores these;
/// the caller resubmits the full history on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub parts: Vec<TurnPart>,
}

/// Inbound relay request.
///
/// Deserialization is deliberately lenient: the contract only requires
/// `prompt` to be a usable string, and history entries that do not parse
/// as turns are dropped instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    prompt: Value,
    #[serde(default)]
    history: Value,
}

impl ChatRequest {
    /// The new user utterance, if the caller supplied a non-empty string.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_str().filter(|s| !s.is_empty())
    }

    /// Caller-supplied turns, oldest first. A missing or non-array
    /// `history` is an empty conversation.
    pub fn history(&self) -> Vec<ConversationTurn> {
        match self.history.as_array() {
            Some(entries) => entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect(),
            None => Vec::new(),
        }
    }
}
