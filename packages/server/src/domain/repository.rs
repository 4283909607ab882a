//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ConnectionId, JoinOutcome, LeaveOutcome, PlaybackCommand, RepositoryError, Room, RoomId,
    RoomMember, Timestamp, VideoUrl,
};

/// Room Registry
///
/// 全ての Room を排他的に所有する。各メソッドは 1 つの Room に対する
/// 単一ライターのクリティカルセクションとして実行される。
///
/// ## 依存性の逆転（DIP）
///
/// - UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない
/// - 返される `Room` は操作直後のスナップショット（コピー）
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を取得、なければ作成してメンバーを参加させる
    ///
    /// 作成と参加は同じクリティカルセクションで行われるため、
    /// 空の Room が外部から観測されることはない。
    async fn join_room(
        &self,
        room_id: &RoomId,
        member: RoomMember,
        video_url: Option<VideoUrl>,
        now: Timestamp,
    ) -> Result<JoinOutcome, RepositoryError>;

    /// メンバーを退出させ、Room が空になったら削除する
    ///
    /// Room の削除はこの操作でのみ行われる。空の判定と削除は同じ Room のロック内で行う。
    async fn leave_room(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<LeaveOutcome, RepositoryError>;

    /// 現在のホストによる再生制御をスナップショットに適用する
    async fn update_playback(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        command: PlaybackCommand,
    ) -> Result<Room, RepositoryError>;

    /// 現在のホストによる動画 URL を記録する
    async fn set_video_url(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        video_url: VideoUrl,
    ) -> Result<Room, RepositoryError>;

    /// Room を取得
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// 全ての Room を取得（ID 順）
    async fn get_rooms(&self) -> Vec<Room>;

    /// Room の数を取得
    async fn count_rooms(&self) -> usize;
}
