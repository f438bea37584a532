//! Periodic revision snapshots.
//!
//! Every note whose content changed since its newest revision gets a new
//! revision on each tick, so history stays reasonably fine-grained even if
//! the process is killed without a graceful shutdown.

use std::time::Duration;

use notewell_db::repositories::RevisionRepo;
use notewell_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often pending revisions are saved.
pub const SAVE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Run the revision saver loop until `cancel` is triggered.
pub async fn run(pool: DbPool, cancel: CancellationToken) {
    tracing::info!(interval_secs = SAVE_INTERVAL.as_secs(), "Revision saver started");

    let mut interval = tokio::time::interval(SAVE_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Revision saver stopping");
                break;
            }
            _ = interval.tick() => {
                match RevisionRepo::save_pending(&pool).await {
                    Ok(0) => tracing::debug!("Revision saver: nothing pending"),
                    Ok(saved) => tracing::info!(saved, "Revision saver: saved revisions"),
                    Err(e) => tracing::error!(error = %e, "Revision saver: save failed"),
                }
            }
        }
    }
}
