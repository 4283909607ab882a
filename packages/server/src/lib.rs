//! Watchroom room synchronization server.
//!
//! Layered as domain / usecase / infrastructure / ui. The binary in
//! `src/bin/server.rs` wires the in-memory repository and the WebSocket
//! pusher into the use cases and hands them to [`ui::Server`].

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
