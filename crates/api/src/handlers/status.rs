use axum::extract::State;
use axum::Json;
use serde::Serialize;

use notewell_core::config_utils::github_url;
use notewell_core::functions::map_to_object;
use notewell_core::git::git_commit;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Server status payload.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Notes with at least one open realtime session.
    pub online_notes: usize,
    pub online_sessions: usize,
    /// Session count per note reference.
    pub note_sessions: serde_json::Map<String, serde_json::Value>,
    pub version: &'static str,
    /// Commit of the running checkout, empty outside a git checkout.
    pub commit: String,
    pub source_url: Option<String>,
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    let counts = state.realtime.note_session_counts().await;
    let note_sessions =
        map_to_object(&counts).map_err(|e| AppError::InternalError(e.to_string()))?;

    let app_root = state.config.app_root.clone();
    let commit = tokio::task::spawn_blocking(move || git_commit(&app_root))
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let version = env!("CARGO_PKG_VERSION");
    let reference = if commit.is_empty() { version } else { commit.as_str() };
    let source_url = state
        .config
        .source_repository
        .as_deref()
        .map(|repo| github_url(repo, reference));

    Ok(Json(StatusResponse {
        online_notes: counts.len(),
        online_sessions: counts.values().sum(),
        note_sessions,
        version,
        commit,
        source_url,
    }))
}
