//! UI layer: axum router, WebSocket session loop and HTTP inspection API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use signal::shutdown_signal;
