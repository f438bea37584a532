//! Author model: the join between a note and a user who wrote part of it.
//!
//! A `(note_id, user_id)` pair is unique (`uq_authors_note_user`). Rows are
//! removed by `ON DELETE CASCADE` when either the note or the user goes away.

use notewell_core::types::{DbId, EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `authors` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Author {
    pub id: DbId,
    /// Cursor/highlight colour used for this author in the editor.
    pub color: Option<String>,
    pub note_id: EntityId,
    pub user_id: EntityId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An author joined with the user's name, for listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuthorWithUser {
    pub id: DbId,
    pub color: Option<String>,
    pub user_id: EntityId,
    pub username: String,
}

/// DTO for changing an author's colour.
#[derive(Debug, Deserialize)]
pub struct UpdateAuthorColor {
    pub color: String,
}
