//! Wire records returned by the JSON API.
//!
//! Field names are camelCase on the wire. Every record derives
//! [`validator::Validate`]; handlers validate before serialising.

pub mod note_authorship;
pub mod note_metadata;
pub mod note_permissions;
pub mod user_info;

pub use note_authorship::NoteAuthorshipDto;
pub use note_metadata::NoteMetadataDto;
pub use note_permissions::NotePermissionsDto;
pub use user_info::UserInfoDto;
