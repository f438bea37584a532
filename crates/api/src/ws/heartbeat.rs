use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::RealtimeManager;

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that pings every realtime session periodically.
///
/// The returned `JoinHandle` is aborted during shutdown.
pub fn start_heartbeat(manager: Arc<RealtimeManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let count = manager.session_count().await;
            tracing::debug!(count, "Realtime heartbeat ping");
            manager.ping_all().await;
        }
    })
}
