use std::sync::Arc;

use notewell_core::avatar::AvatarSettings;
use notewell_core::lifecycle::Lifecycle;

use crate::config::ServerConfig;
use crate::ws::RealtimeManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: notewell_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Open realtime editing sessions.
    pub realtime: Arc<RealtimeManager>,
    /// Starting / running / stopping state shared with the signal listener.
    pub lifecycle: Arc<Lifecycle>,
}

impl AppState {
    pub fn avatar_settings(&self) -> AvatarSettings<'_> {
        AvatarSettings {
            server_url: &self.config.server_url,
            allow_gravatar: self.config.allow_gravatar,
        }
    }
}
