//! Message formatting utilities for client display.

use watchroom_server::infrastructure::dto::websocket::ViewerInfo;
use watchroom_shared::time::timestamp_to_local_time;

use crate::player::Reconciliation;

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner shown after `join-success`
    ///
    /// # Arguments
    ///
    /// * `room_id` - The joined room
    /// * `role` - The role granted by the server
    /// * `connection_id` - The id the server assigned to this connection
    pub fn format_join_success(room_id: &str, role: &str, connection_id: &str) -> String {
        format!(
            "\n\n============================================================\n\
             Joined room '{}' as {} (connection {})\n\
             Type /help for commands.\n\
             ============================================================\n",
            room_id, role, connection_id
        )
    }

    /// Format the current viewer roster (host only)
    pub fn format_viewers_list(viewers: &[ViewerInfo]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\nViewers ({}):\n", RULE, viewers.len()));

        if viewers.is_empty() {
            output.push_str("(No viewers)\n");
        } else {
            for viewer in viewers {
                output.push_str(&format!("  {} [{}]\n", viewer.username, viewer.id));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    pub fn format_viewer_joined(username: &str, viewer_id: &str) -> String {
        format!("\n+ viewer {} [{}] joined\n", username, viewer_id)
    }

    /// Format a `user-left` notification
    pub fn format_user_left(role: &str, connection_id: &str) -> String {
        format!("\n- {} [{}] left\n", role, connection_id)
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `username` - The display name of the sender
    /// * `message` - The message content
    /// * `timestamp` - Server receive time (Unix milliseconds)
    pub fn format_chat_message(username: &str, message: &str, timestamp: i64) -> String {
        format!(
            "\n[{}] @{}: {}\n",
            timestamp_to_local_time(timestamp),
            username,
            message
        )
    }

    /// Format `user-joined-chat` / `user-left-chat`
    pub fn format_chat_presence(username: &str, role: &str, joined: bool, timestamp: i64) -> String {
        let verb = if joined { "joined" } else { "left" };
        format!(
            "\n[{}] * {} ({}) {} the chat\n",
            timestamp_to_local_time(timestamp),
            username,
            role,
            verb
        )
    }

    /// Format a remote sync event and how it was applied locally
    pub fn format_sync(reconciliation: Reconciliation, position: f64) -> String {
        match reconciliation {
            Reconciliation::Resumed => format!("\n▶ play at {}\n", format_position(position)),
            Reconciliation::SeekedAndResumed { drift } => format!(
                "\n▶ play at {} (corrected drift of {:.1}s)\n",
                format_position(position),
                drift
            ),
            Reconciliation::Paused => "\n⏸ paused by host\n".to_string(),
            Reconciliation::SeekedAndPaused => {
                format!("\n⏸ seek to {}\n", format_position(position))
            }
        }
    }

    pub fn format_initial_sync(is_playing: bool, position: f64, video_url: Option<&str>) -> String {
        let state = if is_playing { "playing" } else { "paused" };
        let mut output = format!("\n⟳ synced: {} at {}\n", state, format_position(position));
        if let Some(video_url) = video_url {
            output.push_str(&format!("  video: {}\n", video_url));
        }
        output
    }

    pub fn format_video_url_update(video_url: &str) -> String {
        format!("\n🎬 video: {}\n", video_url)
    }

    /// Format the reply to `/status`
    pub fn format_status(is_playing: bool, position: f64, video_url: Option<&str>) -> String {
        let state = if is_playing { "playing" } else { "paused" };
        format!(
            "\n{} at {} | video: {}\n",
            state,
            format_position(position),
            video_url.unwrap_or("(none)")
        )
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

/// `mm:ss.s`, with hours when needed
fn format_position(seconds: f64) -> String {
    let tenths = (seconds.max(0.0) * 10.0).round() as u64;
    let (total_secs, tenth) = (tenths / 10, tenths % 10);
    let (hours, minutes, secs) = (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}.{}", hours, minutes, secs, tenth)
    } else {
        format!("{:02}:{:02}.{}", minutes, secs, tenth)
    }
}
