pub mod authors;
pub mod avatar;
pub mod metadata;
pub mod note;
pub mod note_actions;
pub mod status;
