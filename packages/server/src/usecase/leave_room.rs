//! UseCase: Room からの退出処理
//!
//! 切断時と、別の Room への再参加時に呼ばれる。
//!
//! ## 通知
//!
//! - ホストの退出: 残りの全メンバーに `user-left`（role = host）
//! - 視聴者の退出: ホストに `user-left`（role = viewer）と最新の `viewers-list`
//! - いずれの場合も残りの全メンバーに `user-left-chat`
//!
//! 上書きされた旧ホストの退出は Room に影響せず、何も通知しない。

use std::sync::Arc;

use watchroom_shared::time::Clock;

use crate::domain::{
    Connection, LeaveOutcome, MessagePusher, Notification, RepositoryError, Role, RoomRepository,
    Timestamp,
};

use super::notify;

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 時刻の取得
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 接続を現在の Room から退出させる
    ///
    /// # Returns
    ///
    /// * `Some(LeaveOutcome)` - 退出処理を行った
    /// * `None` - 接続がどの Room にも参加していない、または Room がすでに存在しない
    pub async fn execute(&self, connection: &mut Connection) -> Option<LeaveOutcome> {
        let membership = connection.leave()?;

        let outcome = match self
            .repository
            .leave_room(&membership.room_id, &connection.id)
            .await
        {
            Ok(outcome) => outcome,
            Err(RepositoryError::RoomNotFound(room_id)) => {
                tracing::debug!(
                    "Room '{}' already removed when '{}' left",
                    room_id,
                    connection.id
                );
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to leave room '{}': {}", membership.room_id, e);
                return None;
            }
        };

        let Some(departed) = outcome.departed.clone() else {
            tracing::debug!(
                "Connection '{}' was no longer a member of room '{}'",
                connection.id,
                membership.room_id
            );
            return Some(outcome);
        };

        let room = &outcome.room;
        match departed.role {
            Role::Host => {
                notify::broadcast(
                    self.message_pusher.as_ref(),
                    room.member_ids(),
                    &Notification::UserLeft {
                        role: Role::Host,
                        connection_id: departed.connection_id.clone(),
                    },
                )
                .await;
            }
            Role::Viewer => {
                if let Some(host_id) = room.host_id() {
                    notify::push(
                        self.message_pusher.as_ref(),
                        host_id,
                        &Notification::UserLeft {
                            role: Role::Viewer,
                            connection_id: departed.connection_id.clone(),
                        },
                    )
                    .await;
                    notify::push(
                        self.message_pusher.as_ref(),
                        host_id,
                        &Notification::ViewersList {
                            viewers: room.viewers.clone(),
                        },
                    )
                    .await;
                }
            }
        }

        notify::broadcast(
            self.message_pusher.as_ref(),
            room.member_ids(),
            &Notification::UserLeftChat {
                member: departed.clone(),
                timestamp: Timestamp::new(self.clock.now_millis()),
            },
        )
        .await;

        if outcome.room_deleted {
            tracing::info!("Room '{}' is empty and was removed", room.id);
        }
        tracing::info!(
            "Connection '{}' left room '{}' as {}",
            departed.connection_id,
            room.id,
            departed.role
        );

        Some(outcome)
    }
}
