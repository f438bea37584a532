use serde::{Deserialize, Serialize};
use validator::Validate;

/// Who owns a note and whom it is shared with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NotePermissionsDto {
    /// User name of the owner; `None` for anonymous notes.
    pub owner: Option<String>,
    /// Coarse permission label stored on the note (e.g. `freely`, `locked`).
    #[validate(length(min = 1))]
    pub level: String,
    pub shared_to_users: Vec<String>,
    pub shared_to_groups: Vec<String>,
}
