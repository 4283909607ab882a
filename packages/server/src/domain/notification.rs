//! Notifications pushed from the server to connections.
//!
//! These are the domain-level counterparts of the outbound wire events; the
//! [`super::MessagePusher`] implementation decides how they are encoded.

use super::{
    entity::{ChatMessage, PlaybackAction, PlaybackSnapshot, RoomMember},
    value_object::{ConnectionId, DisplayName, PlaybackPosition, Role, RoomId, Timestamp, VideoUrl},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Sent to a connection after a successful join.
    JoinSuccess {
        room_id: RoomId,
        role: Role,
        connection_id: ConnectionId,
    },
    /// Sent to a connection whose join request was rejected.
    JoinError { message: String },
    /// Sent to the host when a viewer joins.
    ViewerJoined {
        viewer_id: ConnectionId,
        room_id: RoomId,
        username: DisplayName,
    },
    /// The complete viewer roster, in join order.
    ViewersList { viewers: Vec<RoomMember> },
    /// Asks the host for authoritative state for one viewer.
    RequestVideoState { viewer_id: ConnectionId },
    /// Fast-forwards a viewer to a playback state.
    InitialSync { snapshot: PlaybackSnapshot },
    VideoUrlUpdate { video_url: VideoUrl },
    Sync {
        action: PlaybackAction,
        position: PlaybackPosition,
    },
    Chat(ChatMessage),
    UserJoinedChat {
        member: RoomMember,
        timestamp: Timestamp,
    },
    UserLeftChat {
        member: RoomMember,
        timestamp: Timestamp,
    },
    UserLeft {
        role: Role,
        connection_id: ConnectionId,
    },
}

impl Notification {
    /// Wire event name, used for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            Notification::JoinSuccess { .. } => "join-success",
            Notification::JoinError { .. } => "join-error",
            Notification::ViewerJoined { .. } => "viewer-joined",
            Notification::ViewersList { .. } => "viewers-list",
            Notification::RequestVideoState { .. } => "request-video-state",
            Notification::InitialSync { .. } => "initial-sync",
            Notification::VideoUrlUpdate { .. } => "video-url-update",
            Notification::Sync { .. } => "sync-event",
            Notification::Chat(_) => "chat-message",
            Notification::UserJoinedChat { .. } => "user-joined-chat",
            Notification::UserLeftChat { .. } => "user-left-chat",
            Notification::UserLeft { .. } => "user-left",
        }
    }
}
