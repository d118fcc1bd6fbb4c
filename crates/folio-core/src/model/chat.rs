use serde::{Deserialize, Serialize};

/// Default number of history entries kept before a chat turn.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of a visitor conversation. Lives in the browser; the server only
/// ever sees it as part of a client-supplied history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// What the chat endpoint sends back for a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<String>,
}

/// Keep the first message plus the most recent `max - 1` messages.
pub fn trim_history(history: &[ChatMessage], max: usize) -> Vec<ChatMessage> {
    if history.len() <= max {
        return history.to_vec();
    }
    if max == 0 {
        return Vec::new();
    }

    let mut trimmed = Vec::with_capacity(max);
    trimmed.push(history[0].clone());
    trimmed.extend_from_slice(&history[history.len() - (max - 1)..]);
    trimmed
}
