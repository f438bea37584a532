use notewell_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    pub id: EntityId,
    pub shortid: String,
    pub alias: Option<String>,
    pub title: String,
    pub content: String,
    pub permission: String,
    pub view_count: i64,
    pub owner_id: Option<EntityId>,
    pub last_change_user_id: Option<EntityId>,
    pub last_change_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Note {
    /// The alias when set, else the short id. Used in share links.
    pub fn share_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.shortid)
    }
}

/// DTO for creating a note.
#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub shortid: String,
    pub alias: Option<String>,
    pub title: String,
    pub content: String,
    pub owner_id: Option<EntityId>,
}
