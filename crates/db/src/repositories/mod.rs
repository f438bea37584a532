//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod author_repo;
pub mod note_repo;
pub mod revision_repo;
pub mod user_repo;

pub use author_repo::AuthorRepo;
pub use note_repo::NoteRepo;
pub use revision_repo::RevisionRepo;
pub use user_repo::UserRepo;
