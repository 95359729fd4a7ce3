use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message as stored in the log and delivered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub username: String,
    pub text: String,
    /// Milliseconds since the Unix epoch, server clock.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(username: impl Into<String>, text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
            timestamp: at.timestamp_millis(),
        }
    }
}
