//! Domain layer errors.

use thiserror::Error;

/// 値オブジェクトの検証やドメインルール違反のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Room ID must not be empty")]
    EmptyRoomId,

    #[error("Connection ID must not be empty")]
    EmptyConnectionId,

    #[error("Display name must not be empty")]
    EmptyDisplayName,

    #[error("User ID must not be empty")]
    EmptyUserId,

    #[error("Invalid role: '{0}'")]
    InvalidRole(String),

    #[error("Invalid playback position: {0}")]
    InvalidPosition(f64),

    #[error("Video URL must not be empty")]
    EmptyVideoUrl,

    #[error("Message must not be empty")]
    EmptyMessageContent,

    /// ホスト以外の接続による再生制御
    #[error("Connection '{0}' is not the host of this room")]
    NotHost(String),
}

/// Repository のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// Room 操作中のドメインルール違反
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
