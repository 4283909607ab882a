//! Domain layer: entities, value objects and the ports the use cases depend on.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatMessage, Connection, JoinOutcome, LeaveOutcome, Membership, PlaybackAction,
    PlaybackCommand, PlaybackSnapshot, Room, RoomMember,
};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use factory::ConnectionIdFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::Notification;
pub use repository::RoomRepository;
pub use value_object::{
    ConnectionId, DisplayName, MessageContent, PlaybackPosition, Role, RoomId, Timestamp, UserId,
    VideoUrl,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
