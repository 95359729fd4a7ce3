use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tracing::debug;
use uuid::Uuid;

use murmur_store::MessageLog;
use murmur_types::events::GatewayEvent;
use murmur_types::models::ChatMessage;

/// An active connection: the identity bound at handshake and its outbound queue.
struct Subscriber {
    username: String,
    tx: mpsc::UnboundedSender<GatewayEvent>,
}

/// Owns the broadcast group and serializes every mutation of the message log.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    log: Arc<MessageLog>,

    /// Ping cadence for every connection; two missed pongs drop it.
    heartbeat_interval: Duration,

    /// conn_id -> subscriber. Held for the whole of join, post and leave so
    /// that log order and delivery order agree for every connection.
    subscribers: Mutex<HashMap<Uuid, Subscriber>>,
}

impl Dispatcher {
    pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

    pub fn new(log: Arc<MessageLog>) -> Self {
        Self::with_heartbeat(log, Self::DEFAULT_HEARTBEAT_INTERVAL)
    }

    pub fn with_heartbeat(log: Arc<MessageLog>, heartbeat_interval: Duration) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                log,
                heartbeat_interval,
                subscribers: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.inner.log
    }

    pub fn heartbeat_interval(&self) -> Duration {
        self.inner.heartbeat_interval
    }

    /// Add a connection to the broadcast group. The returned receiver yields
    /// the history snapshot first, then live events. Everyone already in the
    /// group is told about the newcomer.
    pub async fn join(&self, username: String) -> (Uuid, mpsc::UnboundedReceiver<GatewayEvent>) {
        let mut subscribers = self.inner.subscribers.lock().await;

        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(GatewayEvent::ChatHistory(self.inner.log.all()));

        let joined = GatewayEvent::UserJoined(username.clone());
        for sub in subscribers.values() {
            let _ = sub.tx.send(joined.clone());
        }

        subscribers.insert(conn_id, Subscriber { username, tx });
        debug!("Connection {} joined ({} active)", conn_id, subscribers.len());

        (conn_id, rx)
    }

    /// Append a message on behalf of a connection and deliver it to every
    /// connection, the sender included. Returns `None` if the connection has
    /// already left.
    pub async fn post_message(&self, conn_id: Uuid, text: &str) -> Option<ChatMessage> {
        let subscribers = self.inner.subscribers.lock().await;

        let author = &subscribers.get(&conn_id)?.username;
        let message = self.inner.log.append(author, text);

        let event = GatewayEvent::ChatMessage(message.clone());
        for sub in subscribers.values() {
            let _ = sub.tx.send(event.clone());
        }

        Some(message)
    }

    /// Remove a connection and tell the rest of the group who left.
    /// Leaving twice is a no-op.
    pub async fn leave(&self, conn_id: Uuid) {
        let mut subscribers = self.inner.subscribers.lock().await;

        let Some(gone) = subscribers.remove(&conn_id) else {
            return;
        };

        let left = GatewayEvent::UserLeft(gone.username);
        for sub in subscribers.values() {
            let _ = sub.tx.send(left.clone());
        }
        debug!("Connection {} left ({} active)", conn_id, subscribers.len());
    }

    /// Number of active connections.
    pub async fn active_count(&self) -> usize {
        self.inner.subscribers.lock().await.len()
    }
}
