//! Notewell API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! realtime sessions, shutdown coordination) so integration tests and the
//! binary entrypoint can both access them.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod notes;
pub mod render;
pub mod response;
pub mod router;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod ws;
