//! Handlers for the authors of a note.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use notewell_core::avatar::avatar_color;
use notewell_core::error::CoreError;
use notewell_db::models::author::UpdateAuthorColor;
use notewell_db::models::note::Note;
use notewell_db::models::user::User;
use notewell_db::repositories::{AuthorRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::notes::find_note;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for recording an author.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordAuthorRequest {
    #[validate(length(min = 1))]
    pub username: String,
    /// Display colour; derived from the user name when omitted.
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

/// Accept `#rgb` and `#rrggbb`.
fn validate_color(color: &str) -> Result<(), ValidationError> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("color"))
    }
}

async fn load_note(state: &AppState, reference: &str) -> AppResult<Note> {
    find_note(state, reference)
        .await?
        .ok_or_else(|| AppError::not_found("Note", reference))
}

async fn load_user(state: &AppState, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::not_found("User", username))
}

/// GET /api/v1/notes/{note}/authors
pub async fn list_authors(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<impl IntoResponse> {
    let note = load_note(&state, &reference).await?;
    let authors = AuthorRepo::list_by_note(&state.pool, note.id).await?;
    Ok(Json(DataResponse { data: authors }))
}

/// POST /api/v1/notes/{note}/authors
///
/// Idempotent: recording an existing author returns the stored row.
pub async fn record_author(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(input): Json<RecordAuthorRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(CoreError::from)?;

    let note = load_note(&state, &reference).await?;
    let user = load_user(&state, &input.username).await?;
    let color = input
        .color
        .unwrap_or_else(|| avatar_color(&user.username));

    let author = AuthorRepo::record(&state.pool, note.id, user.id, Some(&color)).await?;
    tracing::info!(note_id = %note.id, user_id = %user.id, "Author recorded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: author })))
}

/// PATCH /api/v1/notes/{note}/authors/{username}
///
/// Change an author's colour, the only attribute that can change.
pub async fn update_author_color(
    State(state): State<AppState>,
    Path((reference, username)): Path<(String, String)>,
    Json(input): Json<UpdateAuthorColor>,
) -> AppResult<impl IntoResponse> {
    validate_color(&input.color).map_err(|_| {
        AppError::BadRequest(format!("invalid color: {}", input.color))
    })?;

    let note = load_note(&state, &reference).await?;
    let user = load_user(&state, &username).await?;

    let author = AuthorRepo::update_color(&state.pool, note.id, user.id, &input.color)
        .await?
        .ok_or_else(|| AppError::not_found("Author", &username))?;

    Ok(Json(DataResponse { data: author }))
}
