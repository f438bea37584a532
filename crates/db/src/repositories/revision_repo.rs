//! Repository for the `revisions` table.

use notewell_core::types::EntityId;
use sqlx::PgPool;

use crate::models::revision::{Revision, RevisionSummary};

/// A note is pending when it changed after its newest revision (or has none).
const PENDING_PREDICATE: &str = "n.last_change_at IS NOT NULL AND NOT EXISTS (
        SELECT 1 FROM revisions r
        WHERE r.note_id = n.id AND r.created_at >= n.last_change_at
    )";

/// Provides revision snapshot operations.
pub struct RevisionRepo;

impl RevisionRepo {
    /// List revisions of a note, newest first, without content.
    pub async fn list_by_note(
        pool: &PgPool,
        note_id: EntityId,
    ) -> Result<Vec<RevisionSummary>, sqlx::Error> {
        sqlx::query_as::<_, RevisionSummary>(
            "SELECT id, length, created_at FROM revisions
             WHERE note_id = $1
             ORDER BY created_at DESC",
        )
        .bind(note_id)
        .fetch_all(pool)
        .await
    }

    /// Fetch one revision of a note.
    pub async fn find(
        pool: &PgPool,
        note_id: EntityId,
        revision_id: EntityId,
    ) -> Result<Option<Revision>, sqlx::Error> {
        sqlx::query_as::<_, Revision>(
            "SELECT id, note_id, content, length, created_at FROM revisions
             WHERE note_id = $1 AND id = $2",
        )
        .bind(note_id)
        .bind(revision_id)
        .fetch_optional(pool)
        .await
    }

    /// Snapshot every note with unsaved changes. Returns how many revisions
    /// were written.
    pub async fn save_pending(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let query = format!(
            "INSERT INTO revisions (note_id, content, length)
             SELECT n.id, n.content, char_length(n.content)
             FROM notes n
             WHERE {PENDING_PREDICATE}"
        );
        let result = sqlx::query(&query).execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Count notes whose latest changes have no revision yet.
    pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM notes n WHERE {PENDING_PREDICATE}");
        let (count,): (i64,) = sqlx::query_as(&query).fetch_one(pool).await?;
        Ok(count)
    }
}
