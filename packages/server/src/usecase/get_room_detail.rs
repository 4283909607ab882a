//! UseCase: Room 詳細取得

use std::sync::Arc;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository};

use super::error::GetRoomDetailError;

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Room 詳細を取得
    ///
    /// 不正な Room ID は存在しない Room として扱う。
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;

        self.repository
            .get_room(&room_id)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomNotFound(_) => GetRoomDetailError::RoomNotFound,
                _ => GetRoomDetailError::RepositoryError,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, connection_id};

    use super::*;

    #[tokio::test]
    async fn test_get_room_detail_success() {
        // テスト項目: 存在する Room の詳細が取得できる
        // given (前提条件):
        let fixture = Fixture::new();
        let _host = fixture.joined("host", "R1", "host").await;
        let _viewer = fixture.joined("viewer-a", "R1", "viewer").await;
        let usecase = GetRoomDetailUseCase::new(fixture.repository.clone());

        // when (操作):
        let room = usecase.execute("R1".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(room.host_id(), Some(&connection_id("host")));
        assert_eq!(room.viewer_ids(), vec![connection_id("viewer-a")]);
    }

    #[tokio::test]
    async fn test_get_room_detail_not_found() {
        // テスト項目: 存在しない Room は RoomNotFound になる
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = GetRoomDetailUseCase::new(fixture.repository.clone());

        // when (操作):
        let missing = usecase.execute("nope".to_string()).await;
        let blank = usecase.execute("  ".to_string()).await;

        // then (期待する結果):
        assert_eq!(missing, Err(GetRoomDetailError::RoomNotFound));
        assert_eq!(blank, Err(GetRoomDetailError::RoomNotFound));
    }
}
