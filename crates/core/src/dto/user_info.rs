use serde::{Deserialize, Serialize};
use validator::Validate;

/// Public profile of a user as embedded in other records.
///
/// `photo` and `email` are passed through as stored; a photo may be a
/// relative upload path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoDto {
    #[validate(length(min = 1))]
    pub user_name: String,
    pub display_name: String,
    /// Avatar URL or path.
    pub photo: String,
    pub email: Option<String>,
}
