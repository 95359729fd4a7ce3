use std::sync::{Mutex, MutexGuard, PoisonError};

use murmur_types::models::ChatMessage;

/// Append-only chat history. Unbounded: it grows for the life of the process.
#[derive(Default)]
pub struct MessageLog {
    entries: Mutex<Vec<ChatMessage>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a message stamped with the current wall-clock time.
    pub fn append(&self, username: &str, text: &str) -> ChatMessage {
        let message = ChatMessage::new(username, text, chrono::Utc::now());
        self.entries().push(message.clone());
        message
    }

    /// Every message recorded so far, in append order.
    pub fn all(&self) -> Vec<ChatMessage> {
        self.entries().clone()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
