//! Repository for the `notes` table.

use notewell_core::functions::strip_null_byte;
use notewell_core::types::EntityId;
use sqlx::PgPool;

use crate::models::note::{CreateNote, Note};

/// Column list for notes queries.
const COLUMNS: &str = "id, shortid, alias, title, content, permission, view_count, \
    owner_id, last_change_user_id, last_change_at, created_at, updated_at";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note, returning the created row.
    ///
    /// NUL characters are stripped from the title and content first.
    pub async fn create(pool: &PgPool, input: &CreateNote) -> Result<Note, sqlx::Error> {
        let title = strip_null_byte(&input.title);
        let content = strip_null_byte(&input.content);
        let query = format!(
            "INSERT INTO notes (shortid, alias, title, content, owner_id, last_change_user_id, last_change_at)
             VALUES ($1, $2, $3, $4, $5, $5, now())
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&input.shortid)
            .bind(&input.alias)
            .bind(title.as_ref())
            .bind(content.as_ref())
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a note by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a URL reference to a note.
    ///
    /// The reference is matched against the alias first, then the short id,
    /// then `decoded_id` (the reference decoded as an encoded note id).
    pub async fn find_by_reference(
        pool: &PgPool,
        reference: &str,
        decoded_id: Option<EntityId>,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE alias = $1 OR shortid = $1 OR id = $2
             ORDER BY (alias = $1) IS TRUE DESC, (shortid = $1) DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(reference)
            .bind(decoded_id)
            .fetch_optional(pool)
            .await
    }

    /// Increment the view counter, returning the updated row.
    ///
    /// Returns `None` if the note disappeared in the meantime.
    pub async fn increment_view_count(pool: &PgPool, id: EntityId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET view_count = view_count + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a note. Authors and revisions cascade. Returns `true` if a row
    /// was deleted.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
