//! WebSocket event DTOs.
//!
//! Every text frame carries one envelope:
//!
//! ```json
//! {"event": "sync-event", "data": {"type": "play", "currentTime": 30.0}}
//! ```
//!
//! Payload field names are camelCase.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Events sent by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    Join(JoinPayload),
    SyncEvent(SyncEventPayload),
    SendVideoState(SendVideoStatePayload),
    SendVideoUrl(SendVideoUrlPayload),
    SendChatMessage(SendChatMessagePayload),
}

impl ClientMessage {
    /// Parse one text frame.
    ///
    /// A missing or `null` `data` is read as an empty object, so a bare
    /// `{"event":"join"}` still reaches validation and is answered with
    /// `join-error`.
    pub fn from_frame(text: &str) -> Result<Self, serde_json::Error> {
        let mut envelope: Value = serde_json::from_str(text)?;
        if let Some(object) = envelope.as_object_mut() {
            let data = object.entry("data").or_insert(Value::Null);
            if data.is_null() {
                *data = Value::Object(serde_json::Map::new());
            }
        }
        serde_json::from_value(envelope)
    }
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    JoinSuccess(JoinSuccessPayload),
    JoinError(JoinErrorPayload),
    ViewerJoined(ViewerJoinedPayload),
    ViewersList(ViewersListPayload),
    RequestVideoState(RequestVideoStatePayload),
    InitialSync(InitialSyncPayload),
    VideoUrlUpdate(VideoUrlUpdatePayload),
    SyncEvent(SyncEventPayload),
    ChatMessage(ChatMessagePayload),
    UserJoinedChat(ChatPresencePayload),
    UserLeftChat(ChatPresencePayload),
    UserLeft(UserLeftPayload),
}

// ========================================
// Inbound payloads
// ========================================

/// Every field is optional on the wire so that a missing or mistyped field
/// produces a `join-error` instead of an unparseable frame. Numbers and
/// booleans are taken as their string form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub video_url: Option<String>,
}

/// Scalar JSON values as strings; objects, arrays and `null` as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncEventType {
    Play,
    Pause,
    Seek,
}

/// Used in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEventPayload {
    pub r#type: SyncEventType,
    pub current_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendVideoStatePayload {
    pub viewer_id: String,
    pub is_playing: bool,
    pub current_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendVideoUrlPayload {
    pub viewer_id: String,
    pub video_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendChatMessagePayload {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

// ========================================
// Outbound payloads
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSuccessPayload {
    pub room_id: String,
    pub role: String,
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerJoinedPayload {
    pub viewer_id: String,
    pub room_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerInfo {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewersListPayload {
    pub viewers: Vec<ViewerInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestVideoStatePayload {
    pub viewer_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialSyncPayload {
    pub is_playing: bool,
    pub current_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUrlUpdatePayload {
    pub video_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub message: String,
    pub username: String,
    pub user_id: Option<String>,
    /// Server receive time, Unix milliseconds
    pub timestamp: i64,
}

/// Payload of `user-joined-chat` and `user-left-chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPresencePayload {
    pub connection_id: String,
    pub username: String,
    pub role: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftPayload {
    pub role: String,
    pub connection_id: String,
}
