//! Websocket infrastructure for realtime editing sessions.
//!
//! Tracks which sessions are open on which note, keeps them alive with
//! heartbeats, and lets shutdown put every client into maintenance mode.
//! The document-sync protocol itself is not handled here: inbound frames
//! other than close and pong are ignored.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::realtime_handler;
pub use heartbeat::start_heartbeat;
pub use manager::RealtimeManager;
