use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::{NotePermissionsDto, UserInfoDto};
use crate::types::Timestamp;

/// Descriptive metadata of a note, aggregated from the note, its authors and
/// its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NoteMetadataDto {
    /// URL-encoded note id.
    #[validate(length(min = 1))]
    pub id: String,
    pub alias: Option<String>,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub update_time: Timestamp,
    /// Last editor; `None` when the last change was anonymous.
    #[validate(nested)]
    pub update_user: Option<UserInfoDto>,
    #[validate(range(min = 0))]
    pub view_count: i64,
    pub create_time: Timestamp,
    /// User names of everyone who authored part of the note.
    pub edited_by: Vec<String>,
    #[validate(nested)]
    pub permission: NotePermissionsDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn metadata() -> NoteMetadataDto {
        let now = Utc::now();
        NoteMetadataDto {
            id: "AAAAAAAAAAAAAAAAAAAAAQ".to_string(),
            alias: Some("sync".to_string()),
            title: "Weekly sync".to_string(),
            description: "Notes".to_string(),
            tags: vec!["meeting".to_string()],
            update_time: now,
            update_user: Some(UserInfoDto {
                user_name: "alice".to_string(),
                display_name: "Alice".to_string(),
                photo: "https://notes.example.com/user/alice/avatar.svg".to_string(),
                email: Some("alice@example.com".to_string()),
            }),
            view_count: 3,
            create_time: now,
            edited_by: vec!["alice".to_string(), "bob".to_string()],
            permission: NotePermissionsDto {
                owner: Some("alice".to_string()),
                level: "freely".to_string(),
                shared_to_users: vec![],
                shared_to_groups: vec![],
            },
        }
    }

    #[test]
    fn complete_metadata_validates() {
        assert!(metadata().validate().is_ok());
    }

    #[test]
    fn nested_user_is_validated() {
        let mut dto = metadata();
        if let Some(user) = dto.update_user.as_mut() {
            user.user_name.clear();
        }
        assert!(dto.validate().is_err());
    }

    #[test]
    fn nested_permission_is_validated() {
        let mut dto = metadata();
        dto.permission.level.clear();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn anonymous_update_user_is_allowed() {
        let mut dto = metadata();
        dto.update_user = None;
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn negative_view_count_is_rejected() {
        let mut dto = metadata();
        dto.view_count = -1;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn serialises_with_camel_case_fields() {
        let json = serde_json::to_value(metadata()).unwrap();
        assert_eq!(json["viewCount"], 3);
        assert_eq!(json["editedBy"][1], "bob");
        assert_eq!(json["updateUser"]["userName"], "alice");
        assert_eq!(json["permission"]["sharedToUsers"], serde_json::json!([]));
    }
}
