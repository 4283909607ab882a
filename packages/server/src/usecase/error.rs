//! UseCase 層のエラー

use thiserror::Error;

use crate::domain::{DomainError, RepositoryError};

/// 参加処理のエラー
///
/// `Display` の文字列はそのまま `join-error` のメッセージとして送信される。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JoinRoomError {
    #[error("Missing roomId or role")]
    MissingField,

    #[error("{0}")]
    Invalid(DomainError),

    #[error("Failed to join room: {0}")]
    Repository(RepositoryError),
}

/// 再生制御（sync-event / send-video-state / send-video-url）のエラー
///
/// いずれも送信元には通知されず、破棄される。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncPlaybackError {
    #[error("Connection has not joined a room")]
    NotInRoom,

    #[error("Sender is not the current host")]
    NotHost,

    #[error("Invalid playback request: {0}")]
    Invalid(DomainError),

    #[error("Viewer '{0}' is not in the room")]
    ViewerNotInRoom(String),

    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for SyncPlaybackError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Domain(DomainError::NotHost(_)) => SyncPlaybackError::NotHost,
            RepositoryError::RoomNotFound(room_id) => SyncPlaybackError::RoomNotFound(room_id),
            other => SyncPlaybackError::Repository(other),
        }
    }
}

/// チャット送信のエラー（送信元には通知されない）
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendChatMessageError {
    #[error("Connection has not joined a room")]
    NotInRoom,

    #[error("Invalid chat message: {0}")]
    Invalid(DomainError),

    #[error(transparent)]
    Repository(RepositoryError),
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GetRoomDetailError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Repository error")]
    RepositoryError,
}
