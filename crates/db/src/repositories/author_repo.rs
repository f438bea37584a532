//! Repository for the `authors` join table.

use notewell_core::types::EntityId;
use sqlx::PgPool;

use crate::models::author::{Author, AuthorWithUser};

const COLUMNS: &str = "id, color, note_id, user_id, created_at, updated_at";

/// Provides operations on note authorship.
pub struct AuthorRepo;

impl AuthorRepo {
    /// Record that `user_id` authored `note_id`.
    ///
    /// Idempotent: an existing row is returned unchanged, except that a
    /// missing colour is filled in from `color`.
    pub async fn record(
        pool: &PgPool,
        note_id: EntityId,
        user_id: EntityId,
        color: Option<&str>,
    ) -> Result<Author, sqlx::Error> {
        let query = format!(
            "INSERT INTO authors (note_id, user_id, color)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_authors_note_user
             DO UPDATE SET color = COALESCE(authors.color, EXCLUDED.color)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(note_id)
            .bind(user_id)
            .bind(color)
            .fetch_one(pool)
            .await
    }

    /// Insert an author row, failing with a unique violation if the pair
    /// already exists.
    pub async fn create(
        pool: &PgPool,
        note_id: EntityId,
        user_id: EntityId,
        color: Option<&str>,
    ) -> Result<Author, sqlx::Error> {
        let query = format!(
            "INSERT INTO authors (note_id, user_id, color)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(note_id)
            .bind(user_id)
            .bind(color)
            .fetch_one(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        note_id: EntityId,
        user_id: EntityId,
    ) -> Result<Option<Author>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM authors WHERE note_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Author>(&query)
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a note's authors in the order they joined.
    pub async fn list_by_note(
        pool: &PgPool,
        note_id: EntityId,
    ) -> Result<Vec<AuthorWithUser>, sqlx::Error> {
        sqlx::query_as::<_, AuthorWithUser>(
            "SELECT a.id, a.color, a.user_id, u.username
             FROM authors a
             JOIN users u ON u.id = a.user_id
             WHERE a.note_id = $1
             ORDER BY a.created_at ASC, a.id ASC",
        )
        .bind(note_id)
        .fetch_all(pool)
        .await
    }

    /// Change an author's colour, the only mutable attribute.
    pub async fn update_color(
        pool: &PgPool,
        note_id: EntityId,
        user_id: EntityId,
        color: &str,
    ) -> Result<Option<Author>, sqlx::Error> {
        let query = format!(
            "UPDATE authors SET color = $3, updated_at = now()
             WHERE note_id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(note_id)
            .bind(user_id)
            .bind(color)
            .fetch_optional(pool)
            .await
    }
}
