//! Route definitions for the note JSON API.
//!
//! Mounted at `/notes` by `api_routes()`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{authors, metadata};
use crate::state::AppState;

/// ```text
/// GET    /{note}/metadata              -> get_metadata
/// GET    /{note}/authors               -> list_authors
/// POST   /{note}/authors               -> record_author
/// PATCH  /{note}/authors/{username}    -> update_author_color
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{note}/metadata", get(metadata::get_metadata))
        .route(
            "/{note}/authors",
            get(authors::list_authors).post(authors::record_author),
        )
        .route("/{note}/authors/{username}", patch(authors::update_author_color))
}
