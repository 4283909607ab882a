//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 排他制御
//!
//! ```text
//! rooms: RwLock<HashMap<room_id, Arc<Mutex<RoomSlot>>>>
//! ```
//!
//! - Room ごとに 1 つの `Mutex`（単一ライター）。異なる Room 同士は競合しない
//! - ロック順序は「Room の Mutex → map の RwLock」のみ。map のロックを保持したまま
//!   Room の Mutex を待つことはない
//! - Room を削除する際は Room の Mutex を保持したまま `closed` を立て、map から外す。
//!   削除と競合した参加処理は `closed` を見て新しい Room に対してやり直す

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::domain::{
    ConnectionId, JoinOutcome, LeaveOutcome, PlaybackCommand, RepositoryError, Room, RoomId,
    RoomMember, RoomRepository, Timestamp, VideoUrl,
};

/// map に格納される Room の入れ物
struct RoomSlot {
    room: Room,
    /// map から外された（外されつつある）
    closed: bool,
}

type SharedSlot = Arc<Mutex<RoomSlot>>;

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<RoomId, SharedSlot>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// Room の入れ物を取得、なければ作成
    async fn get_or_create_slot(&self, room_id: &RoomId, now: Timestamp) -> SharedSlot {
        let existing = self.rooms.read().await.get(room_id).cloned();
        if let Some(slot) = existing {
            return slot;
        }

        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::info!("Room '{}' created", room_id);
                Arc::new(Mutex::new(RoomSlot {
                    room: Room::new(room_id.clone(), now),
                    closed: false,
                }))
            })
            .clone()
    }

    async fn find_slot(&self, room_id: &RoomId) -> Result<SharedSlot, RepositoryError> {
        self.rooms
            .read()
            .await
            .get(room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    /// Room の Mutex を取得（削除済みなら RoomNotFound）
    async fn lock_open_slot<'a>(
        &self,
        room_id: &RoomId,
        slot: &'a SharedSlot,
    ) -> Result<MutexGuard<'a, RoomSlot>, RepositoryError> {
        let guard = slot.lock().await;
        if guard.closed {
            return Err(RepositoryError::RoomNotFound(room_id.as_str().to_string()));
        }
        Ok(guard)
    }

    /// Room の Mutex を保持したまま map から外す
    async fn close_slot(&self, room_id: &RoomId, slot: &SharedSlot, guard: &mut RoomSlot) {
        guard.closed = true;
        let mut rooms = self.rooms.write().await;
        if rooms
            .get(room_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            rooms.remove(room_id);
            tracing::info!("Room '{}' deleted", room_id);
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join_room(
        &self,
        room_id: &RoomId,
        member: RoomMember,
        video_url: Option<VideoUrl>,
        now: Timestamp,
    ) -> Result<JoinOutcome, RepositoryError> {
        loop {
            let slot = self.get_or_create_slot(room_id, now).await;
            let mut guard = slot.lock().await;
            if guard.closed {
                // 削除と競合した。新しい Room でやり直す
                tracing::debug!("Room '{}' was closed concurrently, retrying join", room_id);
                continue;
            }
            return Ok(guard.room.join(member, video_url));
        }
    }

    async fn leave_room(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<LeaveOutcome, RepositoryError> {
        let slot = self.find_slot(room_id).await?;
        let mut guard = self.lock_open_slot(room_id, &slot).await?;

        let departed = guard.room.remove_member(connection_id);
        let room_deleted = guard.room.is_empty();
        if room_deleted {
            self.close_slot(room_id, &slot, &mut guard).await;
        }

        Ok(LeaveOutcome {
            departed,
            room: guard.room.clone(),
            room_deleted,
        })
    }

    async fn update_playback(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        command: PlaybackCommand,
    ) -> Result<Room, RepositoryError> {
        let slot = self.find_slot(room_id).await?;
        let mut guard = self.lock_open_slot(room_id, &slot).await?;
        guard.room.apply_playback(sender, command)?;
        Ok(guard.room.clone())
    }

    async fn set_video_url(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        video_url: VideoUrl,
    ) -> Result<Room, RepositoryError> {
        let slot = self.find_slot(room_id).await?;
        let mut guard = self.lock_open_slot(room_id, &slot).await?;
        guard.room.set_video_url(sender, video_url)?;
        Ok(guard.room.clone())
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let slot = self.find_slot(room_id).await?;
        let guard = self.lock_open_slot(room_id, &slot).await?;
        Ok(guard.room.clone())
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let slots: Vec<SharedSlot> = self.rooms.read().await.values().cloned().collect();

        let mut rooms = Vec::with_capacity(slots.len());
        for slot in slots {
            let guard = slot.lock().await;
            if !guard.closed {
                rooms.push(guard.room.clone());
            }
        }
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    async fn count_rooms(&self) -> usize {
        self.rooms.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DisplayName, DomainError, PlaybackAction, PlaybackPosition, Role,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - Room の遅延作成と、空になった Room の削除
    // - ホスト枠の上書き、視聴者の冪等な追加
    // - ホスト以外による再生制御の拒否
    // - 退出によって空になった Room だけが削除されること
    // - 並行した参加・退出の後に空の Room が残らないこと
    // ========================================

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn connection_id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn member(id: &str, role: Role) -> RoomMember {
        RoomMember::new(
            connection_id(id),
            DisplayName::new(id.to_string()).unwrap(),
            None,
            role,
        )
    }

    #[tokio::test]
    async fn test_join_creates_room_lazily() {
        // テスト項目: 未知の Room ID への参加で Room が作成される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let outcome = repo
            .join_room(&room_id("R1"), member("host", Role::Host), None, Timestamp::new(1))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(repo.count_rooms().await, 1);
        assert_eq!(outcome.room.host_id(), Some(&connection_id("host")));
        assert_eq!(outcome.room.created_at, Timestamp::new(1));
    }

    #[tokio::test]
    async fn test_leave_keeps_room_while_members_remain() {
        // テスト項目: ホストが退出しても視聴者が残っていれば Room は残る
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let id = room_id("R1");
        repo.join_room(&id, member("host", Role::Host), None, Timestamp::new(1))
            .await
            .unwrap();
        repo.join_room(&id, member("viewer-a", Role::Viewer), None, Timestamp::new(2))
            .await
            .unwrap();

        // when (操作):
        let outcome = repo.leave_room(&id, &connection_id("host")).await.unwrap();

        // then (期待する結果):
        assert!(!outcome.room_deleted);
        assert_eq!(outcome.departed.map(|m| m.role), Some(Role::Host));
        assert_eq!(outcome.room.host, None);
        assert_eq!(repo.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_leave_deletes_empty_room() {
        // テスト項目: 最後のメンバーが退出すると Room が削除される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let id = room_id("R1");
        repo.join_room(&id, member("viewer-a", Role::Viewer), None, Timestamp::new(1))
            .await
            .unwrap();

        // when (操作):
        let outcome = repo.leave_room(&id, &connection_id("viewer-a")).await.unwrap();

        // then (期待する結果):
        assert!(outcome.room_deleted);
        assert_eq!(repo.count_rooms().await, 0);
        assert_eq!(
            repo.get_room(&id).await,
            Err(RepositoryError::RoomNotFound("R1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_leave_unknown_room_is_not_found() {
        // テスト項目: 存在しない Room からの退出は RoomNotFound になる（二重退出も同様）
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let result = repo.leave_room(&room_id("nope"), &connection_id("c")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::RoomNotFound("nope".to_string())));
    }

    #[tokio::test]
    async fn test_update_playback_rejects_non_host() {
        // テスト項目: ホスト以外の再生制御はエラーになり、スナップショットは変わらない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let id = room_id("R1");
        repo.join_room(&id, member("host", Role::Host), None, Timestamp::new(1))
            .await
            .unwrap();
        repo.join_room(&id, member("viewer-a", Role::Viewer), None, Timestamp::new(2))
            .await
            .unwrap();
        let command = PlaybackCommand::new(
            PlaybackAction::Play,
            PlaybackPosition::new(12.0).unwrap(),
        );

        // when (操作):
        let result = repo
            .update_playback(&id, &connection_id("viewer-a"), command)
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::Domain(DomainError::NotHost(
                "viewer-a".to_string()
            )))
        );
        let room = repo.get_room(&id).await.unwrap();
        assert!(!room.playback.is_playing);
        assert_eq!(room.playback.position, PlaybackPosition::ZERO);
    }

    #[tokio::test]
    async fn test_update_playback_by_host() {
        // テスト項目: ホストの再生制御がスナップショットに反映される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let id = room_id("R1");
        repo.join_room(&id, member("host", Role::Host), None, Timestamp::new(1))
            .await
            .unwrap();
        let command = PlaybackCommand::new(
            PlaybackAction::Play,
            PlaybackPosition::new(30.0).unwrap(),
        );

        // when (操作):
        let room = repo
            .update_playback(&id, &connection_id("host"), command)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(room.playback.is_playing);
        assert_eq!(room.playback.position.seconds(), 30.0);
    }

    #[tokio::test]
    async fn test_get_rooms_sorted_by_id() {
        // テスト項目: Room 一覧は ID 順で返される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        for (room, host) in [("charlie", "h3"), ("alpha", "h1"), ("bravo", "h2")] {
            repo.join_room(&room_id(room), member(host, Role::Host), None, Timestamp::new(1))
                .await
                .unwrap();
        }

        // when (操作):
        let rooms = repo.get_rooms().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|room| room.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "bravo", "charlie"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_join_and_leave_leaves_no_orphan_rooms() {
        // テスト項目: 並行した参加・退出の後に空の Room が残らない
        // given (前提条件):
        let repo = Arc::new(InMemoryRoomRepository::new());
        let id = room_id("busy");

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..32 {
            let repo = repo.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                let name = format!("viewer-{}", i);
                repo.join_room(&id, member(&name, Role::Viewer), None, Timestamp::new(1))
                    .await
                    .unwrap();
                tokio::task::yield_now().await;
                repo.leave_room(&id, &connection_id(&name)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(repo.count_rooms().await, 0);
    }
}
