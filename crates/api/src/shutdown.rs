//! Graceful shutdown on SIGINT / SIGTERM.
//!
//! The first signal received while running moves the [`Lifecycle`] to
//! `Stopping`, puts every realtime client into maintenance mode, removes the
//! lock file, stops the HTTP listener, and then polls until every note's
//! latest changes are saved as a revision. The process exits with `0` once
//! nothing is pending, or `1` when the deadline passes first.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notewell_core::lifecycle::{Lifecycle, SignalDecision};
use notewell_db::repositories::RevisionRepo;
use notewell_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::ws::RealtimeManager;

/// How often the drain loop retries the revision flush.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Saves pending revisions during shutdown.
#[async_trait]
pub trait RevisionFlush: Send + Sync {
    /// Save every pending revision and report how many notes still have
    /// unsaved changes afterwards.
    async fn flush_pending(&self) -> Result<i64, sqlx::Error>;
}

/// [`RevisionFlush`] backed by the `revisions` table.
pub struct PgRevisionFlush {
    pool: DbPool,
}

impl PgRevisionFlush {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevisionFlush for PgRevisionFlush {
    async fn flush_pending(&self) -> Result<i64, sqlx::Error> {
        let saved = RevisionRepo::save_pending(&self.pool).await?;
        if saved > 0 {
            tracing::info!(saved, "Saved pending revisions");
        }
        RevisionRepo::count_pending(&self.pool).await
    }
}

/// Runs the shutdown sequence. Cheap to share behind an `Arc`.
pub struct ShutdownCoordinator {
    lifecycle: Arc<Lifecycle>,
    realtime: Arc<RealtimeManager>,
    flusher: Arc<dyn RevisionFlush>,
    lock_path: Option<PathBuf>,
    poll_interval: Duration,
    timeout: Duration,
    server_cancel: CancellationToken,
}

impl ShutdownCoordinator {
    pub fn new(
        lifecycle: Arc<Lifecycle>,
        realtime: Arc<RealtimeManager>,
        flusher: Arc<dyn RevisionFlush>,
        lock_path: Option<PathBuf>,
        timeout: Duration,
        server_cancel: CancellationToken,
    ) -> Self {
        Self {
            lifecycle,
            realtime,
            flusher,
            lock_path,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout,
            server_cancel,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Handle one termination signal.
    ///
    /// Returns the exit code the process should terminate with, or `None`
    /// when a shutdown is already under way and this signal changes nothing.
    pub async fn handle_term_signal(&self) -> Option<i32> {
        match self.lifecycle.on_term_signal() {
            SignalDecision::ExitImmediately => {
                tracing::info!("Termination signal before startup finished, exiting");
                self.server_cancel.cancel();
                Some(0)
            }
            SignalDecision::AlreadyStopping => {
                tracing::info!("Shutdown already in progress, ignoring signal");
                None
            }
            SignalDecision::BeginDrain => Some(self.drain().await),
        }
    }

    async fn drain(&self) -> i32 {
        tracing::info!(timeout_secs = self.timeout.as_secs(), "Shutting down");

        let disconnected = self.realtime.announce_maintenance_and_disconnect().await;
        tracing::info!(disconnected, "Realtime clients notified");

        self.remove_lock_file().await;
        self.server_cancel.cancel();

        match tokio::time::timeout(self.timeout, self.wait_for_flush()).await {
            Ok(()) => {
                tracing::info!("All revisions saved");
                0
            }
            Err(_) => {
                tracing::error!("Timed out waiting for revisions to be saved");
                1
            }
        }
    }

    async fn remove_lock_file(&self) {
        let Some(path) = &self.lock_path else {
            return;
        };
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::info!(path = %path.display(), "Removed lock file"),
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "Lock file not removed"),
        }
    }

    async fn wait_for_flush(&self) {
        let mut interval = tokio::time::interval(self.poll_interval);
        loop {
            interval.tick().await;
            if !self.realtime.is_ready().await {
                continue;
            }
            match self.flusher.flush_pending().await {
                Ok(0) => return,
                Ok(remaining) => tracing::debug!(remaining, "Revisions still pending"),
                Err(e) => tracing::error!(error = %e, "Failed to save pending revisions"),
            }
        }
    }
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT"),
        () = terminate => tracing::info!("Received SIGTERM"),
    }
}

/// Feed termination signals to the coordinator until one decides the exit
/// code, then terminate the process with it.
pub async fn exit_on_signal(coordinator: Arc<ShutdownCoordinator>) {
    loop {
        wait_for_signal().await;
        if let Some(code) = coordinator.handle_term_signal().await {
            std::process::exit(code);
        }
    }
}
