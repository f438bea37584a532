pub mod health;
pub mod notes;

use axum::routing::get;
use axum::Router;

use crate::handlers::{avatar, note, status};
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /notes/{note}/metadata                 note metadata (GET)
/// /notes/{note}/authors                  list, record (GET, POST)
/// /notes/{note}/authors/{username}       change colour (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/notes", notes::router())
}

/// Build the browser-facing routes at the root.
///
/// ```text
/// GET  /new                              create an empty note
/// POST /new                              create a note from the body
/// GET  /s/{shortid}                      published view
/// GET  /s/{shortid}/{action}             download | edit
/// GET  /p/{shortid}                      slide view
/// GET  /user/{username}/avatar.svg       letter avatar
/// GET  /status                           realtime and build status
/// GET  /realtime?noteId=                 websocket upgrade
/// GET  /{note_id}                        editor
/// GET  /{note_id}/{action}               publish | pretty | slide | download
///                                        | info | gist | revision
/// ```
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/new", get(note::new_empty_note).post(note::create_from_post))
        .route("/s/{shortid}", get(note::show_publish_note))
        .route("/s/{shortid}/{action}", get(note::publish_note_actions))
        .route("/p/{shortid}", get(note::show_publish_slide))
        .route("/user/{username}/avatar.svg", get(avatar::user_avatar))
        .route("/status", get(status::status))
        .route("/realtime", get(ws::realtime_handler))
        .route("/{note_id}", get(note::show_note))
        .route("/{note_id}/{action}", get(note::do_action))
}
