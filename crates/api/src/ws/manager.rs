use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::body::Bytes;
use axum::extract::ws::Message;
use notewell_core::types::{EntityId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Text frame telling clients the server is going into maintenance.
pub const MAINTENANCE_MESSAGE: &str = r#"{"type":"maintenance"}"#;

/// Channel sender half for pushing messages to a websocket session.
pub type SessionSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single realtime session.
pub struct RealtimeSession {
    /// Reference of the note being edited, as given by the client.
    pub note_id: String,
    /// Signed-in user, when known.
    pub user_id: Option<EntityId>,
    /// Channel sender for outbound messages to this session.
    pub sender: SessionSender,
    pub connected_at: Timestamp,
}

/// Manages all open realtime sessions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
///
/// Once maintenance has been announced the manager stays closed: later
/// sessions are told about the maintenance and closed instead of registered.
pub struct RealtimeManager {
    sessions: RwLock<HashMap<String, RealtimeSession>>,
    /// Only written while holding the `sessions` write lock.
    closed: AtomicBool,
}

impl RealtimeManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Register a session on `note_id`.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the websocket sink. After maintenance has been
    /// announced the session is not registered; its receiver yields the
    /// maintenance message and a close frame.
    pub async fn add(
        &self,
        conn_id: String,
        note_id: String,
        user_id: Option<EntityId>,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sessions = self.sessions.write().await;
        if self.closed.load(Ordering::Acquire) {
            tracing::info!(conn_id = %conn_id, "Realtime session refused during maintenance");
            send_maintenance(&tx);
            return rx;
        }
        let session = RealtimeSession {
            note_id,
            user_id,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        sessions.insert(conn_id, session);
        rx
    }

    pub async fn remove(&self, conn_id: &str) {
        self.sessions.write().await.remove(conn_id);
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of open sessions per note reference.
    pub async fn note_session_counts(&self) -> HashMap<String, usize> {
        let sessions = self.sessions.read().await;
        let mut counts = HashMap::new();
        for session in sessions.values() {
            *counts.entry(session.note_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Send a message to every session on a note.
    ///
    /// Returns the number of sessions the message was queued for.
    pub async fn send_to_note(&self, note_id: &str, message: Message) -> usize {
        let sessions = self.sessions.read().await;
        let mut count = 0;
        for session in sessions.values().filter(|s| s.note_id == note_id) {
            let _ = session.sender.send(message.clone());
            count += 1;
        }
        count
    }

    /// Tell every client the server is going into maintenance, then close
    /// and forget all sessions.
    ///
    /// Returns the number of sessions that were disconnected.
    pub async fn announce_maintenance_and_disconnect(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.closed.store(true, Ordering::Release);
        let count = sessions.len();
        for session in sessions.values() {
            send_maintenance(&session.sender);
        }
        sessions.clear();
        tracing::info!(count, "Disconnected all realtime sessions for maintenance");
        count
    }

    /// Whether no session is left that could still produce changes.
    pub async fn is_ready(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Send a Ping frame to every session.
    pub async fn ping_all(&self) {
        let sessions = self.sessions.read().await;
        for session in sessions.values() {
            let _ = session.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

fn send_maintenance(sender: &SessionSender) {
    let _ = sender.send(Message::Text(MAINTENANCE_MESSAGE.into()));
    let _ = sender.send(Message::Close(None));
}

impl Default for RealtimeManager {
    fn default() -> Self {
        Self::new()
    }
}
