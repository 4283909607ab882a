//! Reference CLI client for Watchroom.
//!
//! Joins a room as host or viewer, mirrors the room's playback on a simulated
//! local player and relays chat from the terminal.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod player;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
pub use session::SessionConfig;
