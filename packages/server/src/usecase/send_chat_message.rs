//! UseCase: チャット送信
//!
//! 送信者を含む Room の全メンバーに `chat-message` を配信する。
//! 履歴は保持しない。
//!
//! 表示名はペイロードの `username`、なければ参加時の表示名を使う。
//! userId も同様にペイロード、参加時の値の順に使う。

use std::sync::Arc;

use watchroom_shared::time::Clock;

use crate::domain::{
    ChatMessage, Connection, DisplayName, MessageContent, MessagePusher, Notification,
    RoomRepository, Timestamp, UserId,
};

use super::{error::SendChatMessageError, notify};

/// チャット送信リクエスト（ワイヤ上の値そのまま）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub username: Option<String>,
    pub user_id: Option<String>,
}

/// チャット送信のユースケース
pub struct SendChatMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 受信時刻の取得
    clock: Arc<dyn Clock>,
}

impl SendChatMessageUseCase {
    /// 新しい SendChatMessageUseCase を作成
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

    /// チャットメッセージを配信
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 配信したメッセージ
    /// * `Err(SendChatMessageError)` - 未参加・空のメッセージ・空の表示名
    pub async fn execute(
        &self,
        connection: &Connection,
        request: ChatRequest,
    ) -> Result<ChatMessage, SendChatMessageError> {
        let membership = connection
            .membership()
            .ok_or(SendChatMessageError::NotInRoom)?;

        let content = MessageContent::new(request.message).map_err(SendChatMessageError::Invalid)?;
        let username = match request.username {
            Some(name) => DisplayName::new(name).map_err(SendChatMessageError::Invalid)?,
            None => membership.display_name.clone(),
        };
        let user_id = match request.user_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => Some(UserId::new(id).map_err(SendChatMessageError::Invalid)?),
            None => membership.user_id.clone(),
        };

        let room = self
            .repository
            .get_room(&membership.room_id)
            .await
            .map_err(SendChatMessageError::Repository)?;

        let message = ChatMessage {
            from: connection.id.clone(),
            username,
            user_id,
            content,
            timestamp: Timestamp::new(self.clock.now_millis()),
        };

        notify::broadcast(
            self.message_pusher.as_ref(),
            room.member_ids(),
            &Notification::Chat(message.clone()),
        )
        .await;

        tracing::debug!(
            "Chat from '{}' relayed to {} member(s) of room '{}'",
            connection.id,
            room.member_ids().len(),
            room.id
        );

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, NOW, connection, connection_id};

    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 送信者を含む全メンバーへの配信
    // - 表示名・userId のフォールバック
    // - 空のメッセージ・未参加の接続からの送信が破棄されること
    // ========================================

    fn chat(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_chat_is_delivered_to_everyone_including_sender() {
        // テスト項目: チャットが送信者を含む Room の全メンバーに配信される
        // given (前提条件):
        let fixture = Fixture::new();
        let _host = fixture.joined("host", "R1", "host").await;
        let viewer = fixture.joined("viewer-a", "R1", "viewer").await;
        let _outsider = fixture.joined("outsider", "R2", "viewer").await;

        // when (操作):
        let message = fixture
            .chat
            .execute(&viewer, chat("  hello  "))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(message.content.as_str(), "hello");
        assert_eq!(message.timestamp, Timestamp::new(NOW));
        let expected = vec![Notification::Chat(message)];
        assert_eq!(fixture.pusher.sent_to(&connection_id("host")), expected);
        assert_eq!(fixture.pusher.sent_to(&connection_id("viewer-a")), expected);
        assert!(fixture.pusher.sent_to(&connection_id("outsider")).is_empty());
    }

    #[tokio::test]
    async fn test_username_falls_back_to_join_display_name() {
        // テスト項目: username がない場合は参加時の表示名が使われる
        // given (前提条件):
        let fixture = Fixture::new();
        let viewer = fixture.joined("viewer-a", "R1", "viewer").await;

        // when (操作):
        let message = fixture.chat.execute(&viewer, chat("hi")).await.unwrap();

        // then (期待する結果):
        assert_eq!(message.username.as_str(), "viewer-a");
        assert_eq!(message.user_id, None);
    }

    #[tokio::test]
    async fn test_payload_username_and_user_id_win() {
        // テスト項目: ペイロードの username と userId が優先される
        // given (前提条件):
        let fixture = Fixture::new();
        let viewer = fixture.joined("viewer-a", "R1", "viewer").await;
        let request = ChatRequest {
            message: "hi".to_string(),
            username: Some("Alice".to_string()),
            user_id: Some("u-42".to_string()),
        };

        // when (操作):
        let message = fixture.chat.execute(&viewer, request).await.unwrap();

        // then (期待する結果):
        assert_eq!(message.username.as_str(), "Alice");
        assert_eq!(message.user_id.map(|id| id.into_string()), Some("u-42".to_string()));
    }

    #[tokio::test]
    async fn test_long_message_is_delivered() {
        // テスト項目: 長いメッセージも切り詰められずに配信される
        // given (前提条件):
        let fixture = Fixture::new();
        let viewer = fixture.joined("viewer-a", "R1", "viewer").await;
        let text = "x".repeat(1001);

        // when (操作):
        let message = fixture.chat.execute(&viewer, chat(&text)).await.unwrap();

        // then (期待する結果):
        assert_eq!(message.content.as_str(), text);
        assert_eq!(fixture.pusher.total_sent(), 1);
    }

    #[tokio::test]
    async fn test_blank_message_is_dropped() {
        // テスト項目: 空白のみのメッセージは配信されない
        // given (前提条件):
        let fixture = Fixture::new();
        let viewer = fixture.joined("viewer-a", "R1", "viewer").await;

        // when (操作):
        let result = fixture.chat.execute(&viewer, chat("   ")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(SendChatMessageError::Invalid(_))));
        assert_eq!(fixture.pusher.total_sent(), 0);
    }

    #[tokio::test]
    async fn test_blank_username_is_dropped() {
        // テスト項目: 空の username を明示したメッセージは配信されない
        // given (前提条件):
        let fixture = Fixture::new();
        let viewer = fixture.joined("viewer-a", "R1", "viewer").await;
        let request = ChatRequest {
            message: "hi".to_string(),
            username: Some(" ".to_string()),
            user_id: None,
        };

        // when (操作):
        let result = fixture.chat.execute(&viewer, request).await;

        // then (期待する結果):
        assert!(matches!(result, Err(SendChatMessageError::Invalid(_))));
        assert_eq!(fixture.pusher.total_sent(), 0);
    }

    #[tokio::test]
    async fn test_chat_without_join_is_dropped() {
        // テスト項目: 未参加の接続からのチャットは NotInRoom になる
        // given (前提条件):
        let fixture = Fixture::new();

        // when (操作):
        let result = fixture.chat.execute(&connection("lonely"), chat("hi")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SendChatMessageError::NotInRoom));
    }
}
