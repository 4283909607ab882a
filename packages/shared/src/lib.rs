//! Utilities shared by the Watchroom server and client.

pub mod logger;
pub mod time;
