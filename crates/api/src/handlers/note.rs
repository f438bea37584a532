//! Handlers for the note pages: editor, published view, slides, creation
//! and the per-note action dispatch.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use notewell_core::avatar::encode_uri_component;
use notewell_core::note_meta::{
    decode_title, extract_meta, generate_web_title, parse_meta, parse_opengraph,
};
use notewell_db::models::note::Note;
use notewell_db::repositories::NoteRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::note_actions;
use crate::notes::{find_note_or_create, new_note, note_key, note_url, publish_data};
use crate::render::{render_editor_page, render_publish_page, render_slide_page};
use crate::state::AppState;

const X_ROBOTS_TAG: HeaderName = HeaderName::from_static("x-robots-tag");

/// Query parameters accepted by the action dispatch.
#[derive(Debug, Default, Deserialize)]
pub struct ActionParams {
    /// Revision id for the `revision` action.
    pub revision: Option<String>,
}

/// GET /s/{shortid}/{action}
///
/// `download` serves the markdown, `edit` opens the editor in split view,
/// anything else goes back to the published page.
pub async fn publish_note_actions(
    State(state): State<AppState>,
    Path((shortid, action)): Path<(String, String)>,
) -> AppResult<Response> {
    let note = find_note_or_create(&state, &shortid).await?;
    match action.as_str() {
        "download" => download_markdown(&note),
        "edit" => Ok(Redirect::to(&format!("{}?both", note_url(&state, &note))).into_response()),
        _ => Ok(Redirect::to(&format!("{}/s/{}", state.config.server_url, note.shortid)).into_response()),
    }
}

/// GET /s/{shortid}
///
/// Published, read-only view. Counts a view on every hit.
pub async fn show_publish_note(
    State(state): State<AppState>,
    Path(shortid): Path<String>,
) -> AppResult<Response> {
    show_published(state, shortid, PublishedView::Pretty).await
}

/// GET /p/{shortid}
///
/// Published view as a slide deck.
pub async fn show_publish_slide(
    State(state): State<AppState>,
    Path(shortid): Path<String>,
) -> AppResult<Response> {
    show_published(state, shortid, PublishedView::Slide).await
}

#[derive(Debug, Clone, Copy)]
enum PublishedView {
    Pretty,
    Slide,
}

impl PublishedView {
    fn prefix(self) -> &'static str {
        match self {
            PublishedView::Pretty => "s",
            PublishedView::Slide => "p",
        }
    }
}

async fn show_published(state: AppState, shortid: String, view: PublishedView) -> AppResult<Response> {
    let note = find_note_or_create(&state, &shortid).await?;

    if shortid != note.share_key() {
        let target = format!("{}/{}/{}", state.config.server_url, view.prefix(), note.share_key());
        return Ok(Redirect::to(&target).into_response());
    }

    let note = match NoteRepo::increment_view_count(&state.pool, note.id).await {
        Ok(Some(note)) => note,
        Ok(None) => return Err(AppError::not_found("Note", shortid)),
        Err(e) => {
            tracing::error!(note_id = %note.id, error = %e, "Failed to increment view count");
            return Err(AppError::InternalError("view count update failed".into()));
        }
    };

    let data = publish_data(&state, &note).await?;
    let html = match view {
        PublishedView::Pretty => render_publish_page(&data),
        PublishedView::Slide => render_slide_page(&data),
    };

    Ok(([(CACHE_CONTROL, "private")], Html(html)).into_response())
}

/// GET /{note_id}
///
/// The collaborative editor for a note.
pub async fn show_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> AppResult<Response> {
    let note = find_note_or_create(&state, &note_id).await?;

    if note_id != note_key(&note) {
        return Ok(Redirect::to(&note_url(&state, &note)).into_response());
    }

    let meta = parse_meta(&extract_meta(&note.content).meta);
    let title = meta
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| decode_title(&note.title));
    let title = generate_web_title(&title);
    let opengraph = parse_opengraph(&meta, &title);

    Ok((
        [(CACHE_CONTROL, "private"), (X_ROBOTS_TAG, "noindex, nofollow")],
        Html(render_editor_page(&title, &opengraph)),
    )
        .into_response())
}

/// POST /new
///
/// Create a note from the raw request body and open it.
pub async fn create_from_post(State(state): State<AppState>, body: String) -> AppResult<Response> {
    let length = body.chars().count();
    let max = state.config.document_max_length;
    if length > max {
        return Err(AppError::TooLong { length, max });
    }

    let content = body.replace('\r', "");
    let note = new_note(&state, content, None).await?;
    Ok(Redirect::to(&note_url(&state, &note)).into_response())
}

/// GET /new
///
/// Create an empty note and open it.
pub async fn new_empty_note(State(state): State<AppState>) -> AppResult<Response> {
    let note = new_note(&state, String::new(), None).await?;
    Ok(Redirect::to(&note_url(&state, &note)).into_response())
}

/// GET /{note_id}/{action}
pub async fn do_action(
    State(state): State<AppState>,
    Path((note_id, action)): Path<(String, String)>,
    Query(params): Query<ActionParams>,
) -> AppResult<Response> {
    let note = find_note_or_create(&state, &note_id).await?;
    let server = &state.config.server_url;

    match action.as_str() {
        "publish" | "pretty" => {
            Ok(Redirect::to(&format!("{server}/s/{}", note.share_key())).into_response())
        }
        "slide" => Ok(Redirect::to(&format!("{server}/p/{}", note.share_key())).into_response()),
        "download" => download_markdown(&note),
        "info" => Ok(note_actions::info(&note).into_response()),
        "gist" => note_actions::gist(&state, &note),
        "revision" => note_actions::revision(&state, &note, params.revision.as_deref()).await,
        _ => Ok(Redirect::to(&format!("{server}/{note_id}")).into_response()),
    }
}

/// Serve a note's content as a markdown attachment.
///
/// Cross-origin fetches (including ranged ones) are allowed so other sites
/// can embed the raw file.
pub fn download_markdown(note: &Note) -> AppResult<Response> {
    let filename = format!("{}.md", encode_uri_component(&decode_title(&note.title)));
    let disposition = HeaderValue::from_str(&format!("attachment; filename={filename}"))
        .map_err(|e| AppError::InternalError(format!("invalid download filename: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Range"));
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Cache-Control, Content-Encoding, Content-Range"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/markdown; charset=UTF-8"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("private"));
    headers.insert(CONTENT_DISPOSITION, disposition);
    headers.insert(X_ROBOTS_TAG, HeaderValue::from_static("noindex, nofollow"));

    Ok((headers, Body::from(note.content.clone())).into_response())
}
