//! UseCase 層
//!
//! 受信イベントごとのアプリケーションロジック。Repository と MessagePusher の
//! trait にのみ依存する。

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;
mod notify;
mod send_chat_message;
mod sync_playback;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{GetRoomDetailError, JoinRoomError, SendChatMessageError, SyncPlaybackError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinRequest, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use send_chat_message::{ChatRequest, SendChatMessageUseCase};
pub use sync_playback::SyncPlaybackUseCase;

#[cfg(test)]
pub(crate) mod test_support;
