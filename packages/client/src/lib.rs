//! Watch-party client.
//!
//! Drives a local player from the room's playback state and relays local
//! play/pause/seek actions back to the server.

pub mod command;
pub mod error;
pub mod formatter;
pub mod player;
pub mod reconciler;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
