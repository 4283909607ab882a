//! Error types for the Watchroom client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// The server answered `join` with `join-error`
    #[error("Join rejected: {0}")]
    JoinRejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors from parsing a line typed at the prompt
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type /help)")]
    Unknown(String),

    #[error("Usage: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid position '{0}': expected seconds >= 0")]
    InvalidPosition(String),

    #[error("Only the host can control playback")]
    NotHost,
}
