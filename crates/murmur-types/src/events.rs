use serde::{Deserialize, Serialize};

use crate::models::ChatMessage;

/// Events sent over the WebSocket gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum GatewayEvent {
    /// Full message log, sent once right after the connection is accepted
    ChatHistory(Vec<ChatMessage>),

    /// A message was appended to the log
    ChatMessage(ChatMessage),

    /// Another user connected
    UserJoined(String),

    /// Another user disconnected
    UserLeft(String),
}

/// Commands sent FROM client TO server over WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum GatewayCommand {
    /// Post a message to the room
    ChatMessage(String),
}
