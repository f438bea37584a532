//! Secondary note actions reached through `/{note_id}/{action}`.

use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

use notewell_core::note_id::encode_note_id;
use notewell_core::note_meta::{decode_title, generate_description};
use notewell_core::types::Timestamp;
use notewell_db::models::note::Note;
use notewell_db::repositories::RevisionRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Public summary of a note returned by the `info` action.
#[derive(Debug, Serialize)]
pub struct NoteInfo {
    pub title: String,
    pub description: String,
    pub viewcount: i64,
    pub createtime: Timestamp,
    pub updatetime: Timestamp,
}

/// One entry of the revision list. `time` is in epoch milliseconds.
#[derive(Debug, Serialize)]
pub struct RevisionEntry {
    pub id: uuid::Uuid,
    pub time: i64,
    pub length: i32,
}

#[derive(Debug, Serialize)]
pub struct RevisionList {
    pub revision: Vec<RevisionEntry>,
}

#[derive(Debug, Serialize)]
pub struct RevisionContent {
    pub id: uuid::Uuid,
    pub time: i64,
    pub length: i32,
    pub content: String,
}

/// `info`: title, description, view count and timestamps, readable from
/// any origin.
pub fn info(note: &Note) -> impl IntoResponse {
    let body = NoteInfo {
        title: decode_title(&note.title),
        description: generate_description(&note.content),
        viewcount: note.view_count,
        createtime: note.created_at,
        updatetime: note.last_change_at.unwrap_or(note.updated_at),
    };
    ([(ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(body))
}

/// `gist`: hand over to the GitHub login flow, which exports the note as a
/// gist on return.
pub fn gist(state: &AppState, note: &Note) -> AppResult<Response> {
    if !state.config.gist_enabled {
        return Err(AppError::not_found("Gist export", encode_note_id(note.id)));
    }
    let target = format!(
        "{}/auth/github/callback/{}/gist",
        state.config.server_url,
        encode_note_id(note.id)
    );
    Ok(Redirect::to(&target).into_response())
}

/// `revision`: list the note's revisions, or return one of them when
/// `revision_id` is given.
pub async fn revision(
    state: &AppState,
    note: &Note,
    revision_id: Option<&str>,
) -> AppResult<Response> {
    let Some(revision_id) = revision_id else {
        let revisions = RevisionRepo::list_by_note(&state.pool, note.id).await?;
        let body = RevisionList {
            revision: revisions
                .into_iter()
                .map(|r| RevisionEntry {
                    id: r.id,
                    time: r.created_at.timestamp_millis(),
                    length: r.length,
                })
                .collect(),
        };
        return Ok(Json(body).into_response());
    };

    let id: uuid::Uuid = revision_id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid revision id: {revision_id}")))?;
    let revision = RevisionRepo::find(&state.pool, note.id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Revision", revision_id))?;

    Ok(Json(RevisionContent {
        id: revision.id,
        time: revision.created_at.timestamp_millis(),
        length: revision.length,
        content: revision.content,
    })
    .into_response())
}
