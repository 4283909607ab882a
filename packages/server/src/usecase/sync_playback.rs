//! UseCase: 再生同期
//!
//! ホストからの再生制御（`sync-event`）と、途中参加の視聴者へのホストの応答
//! （`send-video-state` / `send-video-url`）を扱う。
//!
//! いずれの操作も現在のホスト枠を占有している接続からのみ受け付ける。
//! エラーは送信元に通知されず、UI 層でログに記録されて破棄される。

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionId, MessagePusher, Notification, PlaybackAction, PlaybackCommand,
    PlaybackPosition, PlaybackSnapshot, RoomId, RoomRepository, VideoUrl,
};

use super::{error::SyncPlaybackError, notify};

/// 再生同期のユースケース
pub struct SyncPlaybackUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SyncPlaybackUseCase {
    /// 新しい SyncPlaybackUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 再生制御をスナップショットに適用し、送信者以外の全メンバーに配信する
    ///
    /// # Returns
    ///
    /// * `Ok(PlaybackSnapshot)` - 適用後のスナップショット
    /// * `Err(SyncPlaybackError)` - 未参加・ホスト以外・不正な位置
    pub async fn execute(
        &self,
        connection: &Connection,
        action: PlaybackAction,
        current_time: f64,
    ) -> Result<PlaybackSnapshot, SyncPlaybackError> {
        let room_id = joined_room(connection)?;
        let position = PlaybackPosition::new(current_time).map_err(SyncPlaybackError::Invalid)?;

        let room = self
            .repository
            .update_playback(
                room_id,
                &connection.id,
                PlaybackCommand::new(action, position),
            )
            .await?;

        notify::broadcast(
            self.message_pusher.as_ref(),
            room.member_ids_except(&connection.id),
            &Notification::Sync { action, position },
        )
        .await;

        tracing::debug!(
            "Room '{}' playback {:?} at {:.2}s",
            room.id,
            action,
            position.seconds()
        );

        Ok(room.playback)
    }

    /// ホストの再生状態を指定した視聴者に `initial-sync` として中継する
    ///
    /// スナップショットは更新しない。
    pub async fn relay_video_state(
        &self,
        connection: &Connection,
        viewer_id: String,
        is_playing: bool,
        current_time: f64,
    ) -> Result<(), SyncPlaybackError> {
        let room_id = joined_room(connection)?;
        let position = PlaybackPosition::new(current_time).map_err(SyncPlaybackError::Invalid)?;
        let viewer_id = ConnectionId::new(viewer_id).map_err(SyncPlaybackError::Invalid)?;

        let room = self.repository.get_room(room_id).await?;
        if !room.is_host(&connection.id) {
            return Err(SyncPlaybackError::NotHost);
        }
        if !room.has_viewer(&viewer_id) {
            return Err(SyncPlaybackError::ViewerNotInRoom(
                viewer_id.as_str().to_string(),
            ));
        }

        notify::push(
            self.message_pusher.as_ref(),
            &viewer_id,
            &Notification::InitialSync {
                snapshot: PlaybackSnapshot {
                    is_playing,
                    position,
                    video_url: room.playback.video_url.clone(),
                },
            },
        )
        .await;

        Ok(())
    }

    /// ホストの動画 URL を記録し、指定した視聴者に `video-url-update` を送る
    ///
    /// 視聴者が Room にいない場合も URL は記録される。
    pub async fn relay_video_url(
        &self,
        connection: &Connection,
        viewer_id: String,
        video_url: String,
    ) -> Result<(), SyncPlaybackError> {
        let room_id = joined_room(connection)?;
        let video_url = VideoUrl::new(video_url).map_err(SyncPlaybackError::Invalid)?;
        let viewer_id = ConnectionId::new(viewer_id).map_err(SyncPlaybackError::Invalid)?;

        let room = self
            .repository
            .set_video_url(room_id, &connection.id, video_url.clone())
            .await?;
        if !room.has_viewer(&viewer_id) {
            return Err(SyncPlaybackError::ViewerNotInRoom(
                viewer_id.as_str().to_string(),
            ));
        }

        notify::push(
            self.message_pusher.as_ref(),
            &viewer_id,
            &Notification::VideoUrlUpdate { video_url },
        )
        .await;

        Ok(())
    }
}

fn joined_room(connection: &Connection) -> Result<&RoomId, SyncPlaybackError> {
    connection.room_id().ok_or(SyncPlaybackError::NotInRoom)
}
