//! Playback synchronization server library.
//!
//! Keeps the play/pause mode and position of a shared "room" consistent
//! across every viewer connected to it over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
