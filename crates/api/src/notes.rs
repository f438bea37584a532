//! Note lookup and creation shared by the page and API handlers.

use notewell_core::avatar::avatar_url;
use notewell_core::note_id::{decode_note_id, encode_note_id, generate_short_id, is_valid_alias};
use notewell_core::note_meta::{
    decode_title, extract_meta, generate_description, generate_title, generate_web_title,
    parse_meta,
};
use notewell_core::types::{EntityId, Timestamp};
use notewell_db::models::note::{CreateNote, Note};
use notewell_db::models::user::User;
use notewell_db::repositories::{NoteRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Resolve a URL reference (alias, short id or encoded id) to a note.
pub async fn find_note(state: &AppState, reference: &str) -> AppResult<Option<Note>> {
    let decoded = decode_note_id(reference);
    Ok(NoteRepo::find_by_reference(&state.pool, reference, decoded).await?)
}

/// Resolve a reference, creating an empty note under that alias when free
/// URLs are enabled.
pub async fn find_note_or_create(state: &AppState, reference: &str) -> AppResult<Note> {
    if let Some(note) = find_note(state, reference).await? {
        return Ok(note);
    }

    if state.config.allow_free_url && is_valid_alias(reference) {
        tracing::info!(alias = %reference, "Creating note for free URL");
        let note = insert_note(state, Some(reference.to_string()), String::new(), None).await?;
        return Ok(note);
    }

    Err(AppError::not_found("Note", reference))
}

/// Create a note from `content` and return it.
pub async fn new_note(
    state: &AppState,
    content: String,
    owner_id: Option<EntityId>,
) -> AppResult<Note> {
    let note = insert_note(state, None, content, owner_id).await?;
    tracing::info!(note_id = %note.id, shortid = %note.shortid, "Note created");
    Ok(note)
}

async fn insert_note(
    state: &AppState,
    alias: Option<String>,
    content: String,
    owner_id: Option<EntityId>,
) -> AppResult<Note> {
    let input = CreateNote {
        shortid: generate_short_id(),
        alias,
        title: generate_title(&content),
        content,
        owner_id,
    };
    Ok(NoteRepo::create(&state.pool, &input).await?)
}

/// Path segment under which the editor serves a note: its alias, else its
/// encoded id.
pub fn note_key(note: &Note) -> String {
    note.alias
        .clone()
        .unwrap_or_else(|| encode_note_id(note.id))
}

/// Absolute editor URL of a note.
pub fn note_url(state: &AppState, note: &Note) -> String {
    format!("{}/{}", state.config.server_url, note_key(note))
}

/// A user as shown on published pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PageUser {
    pub name: String,
    pub photo: String,
}

/// Everything the publish and slide pages display.
#[derive(Debug, Clone)]
pub struct PublishData {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub robots: Option<String>,
    pub lang: Option<String>,
    pub dir: Option<String>,
    /// Markdown body with the front matter removed.
    pub body: String,
    pub view_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub owner: Option<PageUser>,
    pub last_change_user: Option<PageUser>,
}

/// Gather the data for the publish and slide pages.
pub async fn publish_data(state: &AppState, note: &Note) -> AppResult<PublishData> {
    let extracted = extract_meta(&note.content);
    let meta = parse_meta(&extracted.meta);
    let title = meta
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| decode_title(&note.title));

    let owner = page_user(state, note.owner_id).await?;
    let last_change_user = page_user(state, note.last_change_user_id).await?;

    Ok(PublishData {
        title: generate_web_title(&title),
        description: generate_description(&note.content),
        tags: meta.tags,
        robots: meta.robots,
        lang: meta.lang,
        dir: meta.dir,
        body: extracted.body,
        view_count: note.view_count,
        created_at: note.created_at,
        updated_at: note.last_change_at.unwrap_or(note.updated_at),
        owner,
        last_change_user,
    })
}

async fn page_user(state: &AppState, user_id: Option<EntityId>) -> AppResult<Option<PageUser>> {
    let Some(user_id) = user_id else {
        return Ok(None);
    };
    let user = UserRepo::find_by_id(&state.pool, user_id).await?;
    Ok(user.map(|u| PageUser {
        name: u.name().to_string(),
        photo: user_photo(state, &u),
    }))
}

/// Profile photo of a user: the stored photo, else an avatar URL.
pub fn user_photo(state: &AppState, user: &User) -> String {
    match user.photo.as_deref().filter(|p| !p.is_empty()) {
        Some(photo) => photo.to_string(),
        None => avatar_url(
            &user.username,
            user.email.as_deref().unwrap_or(""),
            false,
            state.avatar_settings(),
        ),
    }
}
