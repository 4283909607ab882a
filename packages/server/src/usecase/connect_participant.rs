//! UseCase: 接続処理
//!
//! WebSocket の接続確立時に呼ばれ、接続 ID を発行して MessagePusher に登録する。
//! この時点ではどの Room にも参加していない。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続 ID の発行と MessagePusher への登録
//! - エッジケース：連続した接続で ID が重複しない

use std::sync::Arc;

use watchroom_shared::time::Clock;

use crate::domain::{
    Connection, ConnectionIdFactory, DomainError, MessagePusher, PusherChannel, Timestamp,
};

/// 接続のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 時刻の取得
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 接続を受け付ける
    ///
    /// # Arguments
    ///
    /// * `sender` - 接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 未参加状態の接続
    /// * `Err(DomainError)` - 接続 ID の発行に失敗
    pub async fn execute(&self, sender: PusherChannel) -> Result<Connection, DomainError> {
        let connection_id = ConnectionIdFactory::generate()?;
        let connected_at = Timestamp::new(self.clock.now_millis());

        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        Ok(Connection::new(connection_id, connected_at))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{NOW, RecordingPusher};
    use watchroom_shared::time::FixedClock;

    use super::*;

    #[tokio::test]
    async fn test_execute_registers_connection() {
        // テスト項目: 接続 ID が発行され、MessagePusher に登録される
        // given (前提条件):
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = ConnectParticipantUseCase::new(pusher.clone(), Arc::new(FixedClock::new(NOW)));
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

        // when (操作):
        let connection = usecase.execute(tx).await.unwrap();

        // then (期待する結果):
        assert!(pusher.is_registered(&connection.id));
        assert_eq!(connection.connected_at, Timestamp::new(NOW));
        assert_eq!(connection.membership(), None);
    }

    #[tokio::test]
    async fn test_execute_issues_unique_ids() {
        // テスト項目: 連続した接続に異なる ID が発行される
        // given (前提条件):
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = ConnectParticipantUseCase::new(pusher.clone(), Arc::new(FixedClock::new(NOW)));
        let (tx1, _rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, _rx2) = tokio::sync::mpsc::unbounded_channel();

        // when (操作):
        let first = usecase.execute(tx1).await.unwrap();
        let second = usecase.execute(tx2).await.unwrap();

        // then (期待する結果):
        assert_ne!(first.id, second.id);
        assert!(pusher.is_registered(&first.id));
        assert!(pusher.is_registered(&second.id));
    }
}
