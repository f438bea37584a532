use notewell_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `revisions` table: a snapshot of note content.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Revision {
    pub id: EntityId,
    pub note_id: EntityId,
    pub content: String,
    pub length: i32,
    pub created_at: Timestamp,
}

/// Revision listing entry without the content.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RevisionSummary {
    pub id: EntityId,
    pub length: i32,
    pub created_at: Timestamp,
}
