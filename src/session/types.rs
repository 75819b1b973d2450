use crate::providers::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session key used when a request does not name one
///
/// Every caller that omits a session id shares this session. That is a
/// known weakness of unauthenticated access, not an isolation guarantee.
pub const DEFAULT_SESSION_ID: &str = "global";

/// Resolve an optional caller-supplied session id to a store key
///
/// # Examples
///
/// ```
/// use learnify::session::resolve_session_id;
///
/// assert_eq!(resolve_session_id(Some("s1")), "s1");
/// assert_eq!(resolve_session_id(Some("")), "global");
/// assert_eq!(resolve_session_id(None), "global");
/// ```
pub fn resolve_session_id(session_id: Option<&str>) -> String {
    match session_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => DEFAULT_SESSION_ID.to_string(),
    }
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The learner asking a question
    User,
    /// The tutor's answer
    Assistant,
}

/// One immutable entry of a session's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke
    pub role: TurnRole,
    /// What was said
    pub text: String,
    /// When the turn was recorded
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// A learner turn stamped with the current time
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// A tutor turn stamped with the current time
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Convert into a provider message for model context
    pub fn to_message(&self) -> Message {
        match self.role {
            TurnRole::User => Message::user(self.text.clone()),
            TurnRole::Assistant => Message::assistant(self.text.clone()),
        }
    }
}
