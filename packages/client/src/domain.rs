//! Domain logic for client-side operations.
//!
//! Pure functions for prompt parsing and reconnect decisions, kept free of
//! I/O so they are easy to test.

use crate::error::{ClientError, CommandError};

/// Role requested when joining
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClientRole {
    Host,
    Viewer,
}

impl ClientRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientRole::Host => "host",
            ClientRole::Viewer => "viewer",
        }
    }
}

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `/play [t]`: resume, optionally from `t`
    Play(Option<f64>),
    /// `/pause`
    Pause,
    /// `/seek t`
    Seek(f64),
    /// `/url u`: set the video url and share it with the viewers
    Url(String),
    /// `/status`
    Status,
    /// `/help`
    Help,
    /// `/quit`
    Quit,
    /// Anything that is not a command
    Chat(String),
}

pub const HELP: &str = "\
Commands:
  /play [t]   resume playback (host), optionally from t seconds
  /pause      pause playback (host)
  /seek t     jump to t seconds (host)
  /url u      share a video url with the room (host)
  /status     show the local player state
  /quit       leave the room
Anything else is sent as a chat message.";

/// Parse one prompt line.
///
/// Playback commands are only accepted for the host.
pub fn parse_command(line: &str, role: ClientRole) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let argument = parts.next();

    let command = match name {
        "play" => Command::Play(argument.map(parse_position).transpose()?),
        "pause" => Command::Pause,
        "seek" => Command::Seek(parse_position(
            argument.ok_or(CommandError::MissingArgument("/seek <seconds>"))?,
        )?),
        "url" => Command::Url(
            argument
                .ok_or(CommandError::MissingArgument("/url <video-url>"))?
                .to_string(),
        ),
        "status" => return Ok(Command::Status),
        "help" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    if role != ClientRole::Host {
        return Err(CommandError::NotHost);
    }
    Ok(command)
}

fn parse_position(value: &str) -> Result<f64, CommandError> {
    match value.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(CommandError::InvalidPosition(value.to_string())),
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// A rejected join will be rejected again, so it is never retried.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::JoinRejected(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}
