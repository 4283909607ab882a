//! UseCase: 切断処理
//!
//! トランスポートの切断時に呼ばれる。参加中の Room からの退出と、
//! MessagePusher からの登録解除を行う。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断後に接続へのメッセージ送信が残らないことを保証
//! - Room に参加したまま切断された場合も退出処理が行われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加中の接続の切断
//! - エッジケース：一度も参加していない接続の切断

use std::sync::Arc;

use crate::domain::{Connection, MessagePusher};

use super::LeaveRoomUseCase;

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Room 退出のユースケース
    leave_room: Arc<LeaveRoomUseCase>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(leave_room: Arc<LeaveRoomUseCase>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            leave_room,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// Room からの退出を先に行い、退出通知を送り終えてから登録を解除する。
    pub async fn execute(&self, mut connection: Connection) {
        self.leave_room.execute(&mut connection).await;
        self.message_pusher.unregister_client(&connection.id).await;
        tracing::info!("Connection '{}' disconnected", connection.id);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, connection, connection_id};
    use crate::domain::{MessagePusher, Notification, Role, RoomId, RoomRepository};

    use super::*;

    #[tokio::test]
    async fn test_disconnect_leaves_room_and_unregisters() {
        // テスト項目: 参加中の接続の切断で Room から退出し、登録が解除される
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase =
            DisconnectParticipantUseCase::new(fixture.leave.clone(), fixture.pusher.clone());
        let _host = fixture.joined("host", "R1", "host").await;
        let viewer = fixture.joined("viewer-a", "R1", "viewer").await;
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        fixture
            .pusher
            .register_client(connection_id("viewer-a"), tx)
            .await;

        // when (操作):
        usecase.execute(viewer).await;

        // then (期待する結果):
        assert!(!fixture.pusher.is_registered(&connection_id("viewer-a")));
        let room = fixture
            .repository
            .get_room(&RoomId::new("R1".to_string()).unwrap())
            .await
            .unwrap();
        assert!(room.viewers.is_empty());
        let received = fixture.pusher.sent_to(&connection_id("host"));
        assert_eq!(
            received[0],
            Notification::UserLeft {
                role: Role::Viewer,
                connection_id: connection_id("viewer-a"),
            }
        );
    }

    #[tokio::test]
    async fn test_disconnect_without_join() {
        // テスト項目: 未参加の接続の切断は登録解除のみを行う
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase =
            DisconnectParticipantUseCase::new(fixture.leave.clone(), fixture.pusher.clone());
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        fixture
            .pusher
            .register_client(connection_id("lonely"), tx)
            .await;

        // when (操作):
        usecase.execute(connection("lonely")).await;

        // then (期待する結果):
        assert!(!fixture.pusher.is_registered(&connection_id("lonely")));
        assert_eq!(fixture.pusher.total_sent(), 0);
    }
}
