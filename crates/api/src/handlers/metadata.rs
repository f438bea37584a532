use axum::extract::{Path, State};
use axum::Json;
use validator::Validate;

use notewell_core::dto::{NoteMetadataDto, NotePermissionsDto, UserInfoDto};
use notewell_core::note_id::encode_note_id;
use notewell_core::note_meta::{decode_title, extract_meta, generate_description, parse_meta};
use notewell_core::types::EntityId;
use notewell_db::models::note::Note;
use notewell_db::repositories::{AuthorRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::notes::{find_note, user_photo};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notes/{note}/metadata
///
/// Unlike the page routes, an unknown reference never creates a note.
pub async fn get_metadata(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<DataResponse<NoteMetadataDto>>> {
    let note = find_note(&state, &reference)
        .await?
        .ok_or_else(|| AppError::not_found("Note", &reference))?;

    let metadata = build_metadata(&state, &note).await?;
    metadata.validate().map_err(|e| {
        AppError::InternalError(format!("metadata for note {} failed validation: {e}", note.id))
    })?;

    Ok(Json(DataResponse { data: metadata }))
}

async fn build_metadata(state: &AppState, note: &Note) -> AppResult<NoteMetadataDto> {
    let meta = parse_meta(&extract_meta(&note.content).meta);

    let update_user = user_info(state, note.last_change_user_id).await?;
    let owner = match note.owner_id {
        Some(id) => UserRepo::find_by_id(&state.pool, id).await?.map(|u| u.username),
        None => None,
    };
    let edited_by = AuthorRepo::list_by_note(&state.pool, note.id)
        .await?
        .into_iter()
        .map(|a| a.username)
        .collect();

    Ok(NoteMetadataDto {
        id: encode_note_id(note.id),
        alias: note.alias.clone(),
        title: decode_title(&note.title),
        description: generate_description(&note.content),
        tags: meta.tags,
        update_time: note.last_change_at.unwrap_or(note.updated_at),
        update_user,
        view_count: note.view_count,
        create_time: note.created_at,
        edited_by,
        permission: NotePermissionsDto {
            owner,
            level: note.permission.clone(),
            shared_to_users: Vec::new(),
            shared_to_groups: Vec::new(),
        },
    })
}

async fn user_info(state: &AppState, user_id: Option<EntityId>) -> AppResult<Option<UserInfoDto>> {
    let Some(user_id) = user_id else {
        return Ok(None);
    };
    let Some(user) = UserRepo::find_by_id(&state.pool, user_id).await? else {
        return Ok(None);
    };
    Ok(Some(UserInfoDto {
        user_name: user.username.clone(),
        display_name: user.name().to_string(),
        photo: user_photo(state, &user),
        email: user.email.clone().filter(|e| !e.is_empty()),
    }))
}
