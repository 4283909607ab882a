//! Conversion logic between DTOs and domain entities.

use watchroom_shared::time::timestamp_to_rfc3339;

use crate::domain::{Notification, PlaybackAction, Room, RoomMember};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::SyncEventType> for PlaybackAction {
    fn from(dto: dto::SyncEventType) -> Self {
        match dto {
            dto::SyncEventType::Play => PlaybackAction::Play,
            dto::SyncEventType::Pause => PlaybackAction::Pause,
            dto::SyncEventType::Seek => PlaybackAction::Seek,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<PlaybackAction> for dto::SyncEventType {
    fn from(action: PlaybackAction) -> Self {
        match action {
            PlaybackAction::Play => dto::SyncEventType::Play,
            PlaybackAction::Pause => dto::SyncEventType::Pause,
            PlaybackAction::Seek => dto::SyncEventType::Seek,
        }
    }
}

impl From<&RoomMember> for dto::ViewerInfo {
    fn from(member: &RoomMember) -> Self {
        Self {
            id: member.connection_id.as_str().to_string(),
            username: member.display_name.as_str().to_string(),
        }
    }
}

impl From<&RoomMember> for http::MemberDto {
    fn from(member: &RoomMember) -> Self {
        Self {
            id: member.connection_id.as_str().to_string(),
            username: member.display_name.as_str().to_string(),
        }
    }
}

fn chat_presence(member: &RoomMember, timestamp: i64) -> dto::ChatPresencePayload {
    dto::ChatPresencePayload {
        connection_id: member.connection_id.as_str().to_string(),
        username: member.display_name.as_str().to_string(),
        role: member.role.as_str().to_string(),
        timestamp,
    }
}

impl From<&Notification> for dto::ServerMessage {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::JoinSuccess {
                room_id,
                role,
                connection_id,
            } => dto::ServerMessage::JoinSuccess(dto::JoinSuccessPayload {
                room_id: room_id.as_str().to_string(),
                role: role.as_str().to_string(),
                connection_id: connection_id.as_str().to_string(),
            }),
            Notification::JoinError { message } => {
                dto::ServerMessage::JoinError(dto::JoinErrorPayload {
                    message: message.clone(),
                })
            }
            Notification::ViewerJoined {
                viewer_id,
                room_id,
                username,
            } => dto::ServerMessage::ViewerJoined(dto::ViewerJoinedPayload {
                viewer_id: viewer_id.as_str().to_string(),
                room_id: room_id.as_str().to_string(),
                username: username.as_str().to_string(),
            }),
            Notification::ViewersList { viewers } => {
                dto::ServerMessage::ViewersList(dto::ViewersListPayload {
                    viewers: viewers.iter().map(dto::ViewerInfo::from).collect(),
                })
            }
            Notification::RequestVideoState { viewer_id } => {
                dto::ServerMessage::RequestVideoState(dto::RequestVideoStatePayload {
                    viewer_id: viewer_id.as_str().to_string(),
                })
            }
            Notification::InitialSync { snapshot } => {
                dto::ServerMessage::InitialSync(dto::InitialSyncPayload {
                    is_playing: snapshot.is_playing,
                    current_time: snapshot.position.seconds(),
                    video_url: snapshot
                        .video_url
                        .as_ref()
                        .map(|url| url.as_str().to_string()),
                })
            }
            Notification::VideoUrlUpdate { video_url } => {
                dto::ServerMessage::VideoUrlUpdate(dto::VideoUrlUpdatePayload {
                    video_url: video_url.as_str().to_string(),
                })
            }
            Notification::Sync { action, position } => {
                dto::ServerMessage::SyncEvent(dto::SyncEventPayload {
                    r#type: (*action).into(),
                    current_time: position.seconds(),
                })
            }
            Notification::Chat(message) => dto::ServerMessage::ChatMessage(dto::ChatMessagePayload {
                message: message.content.as_str().to_string(),
                username: message.username.as_str().to_string(),
                user_id: message.user_id.as_ref().map(|id| id.as_str().to_string()),
                timestamp: message.timestamp.value(),
            }),
            Notification::UserJoinedChat { member, timestamp } => {
                dto::ServerMessage::UserJoinedChat(chat_presence(member, timestamp.value()))
            }
            Notification::UserLeftChat { member, timestamp } => {
                dto::ServerMessage::UserLeftChat(chat_presence(member, timestamp.value()))
            }
            Notification::UserLeft {
                role,
                connection_id,
            } => dto::ServerMessage::UserLeft(dto::UserLeftPayload {
                role: role.as_str().to_string(),
                connection_id: connection_id.as_str().to_string(),
            }),
        }
    }
}

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            has_host: room.host.is_some(),
            viewer_count: room.viewers.len(),
            is_playing: room.playback.is_playing,
            current_time: room.playback.position.seconds(),
            video_url: room
                .playback
                .video_url
                .as_ref()
                .map(|url| url.as_str().to_string()),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            host: room.host.as_ref().map(http::MemberDto::from),
            viewers: room.viewers.iter().map(http::MemberDto::from).collect(),
            playback: http::PlaybackDto {
                is_playing: room.playback.is_playing,
                current_time: room.playback.position.seconds(),
                video_url: room
                    .playback
                    .video_url
                    .as_ref()
                    .map(|url| url.as_str().to_string()),
            },
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}
