//! Domain logic shared by the Notewell database and API crates.
//!
//! Everything in here is free of I/O except [`git`], which reads the local
//! repository metadata to report the running build.

pub mod avatar;
pub mod config_utils;
pub mod dto;
pub mod error;
pub mod functions;
pub mod git;
pub mod lifecycle;
pub mod mime;
pub mod note_id;
pub mod note_meta;
pub mod types;
