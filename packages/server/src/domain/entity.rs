//! Entities
//!
//! Room とその再生スナップショット、接続ごとの状態を表す。
//! Room は接続の ID のみを保持し、接続そのものは所有しない。

use super::{
    error::DomainError,
    value_object::{
        ConnectionId, DisplayName, MessageContent, PlaybackPosition, Role, RoomId, Timestamp,
        UserId, VideoUrl,
    },
};

/// Room の参加者（ホストまたは視聴者）
#[derive(Debug, Clone, PartialEq)]
pub struct RoomMember {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub user_id: Option<UserId>,
    pub role: Role,
}

impl RoomMember {
    pub fn new(
        connection_id: ConnectionId,
        display_name: DisplayName,
        user_id: Option<UserId>,
        role: Role,
    ) -> Self {
        Self {
            connection_id,
            display_name,
            user_id,
            role,
        }
    }
}

/// 再生スナップショット
///
/// ホストから最後に受け取った再生状態。途中参加の視聴者の早送りに使う。
/// 壁時計のアンカーは持たない（視聴者側で外挿する）。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub position: PlaybackPosition,
    pub video_url: Option<VideoUrl>,
}

/// 再生制御の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Play,
    Pause,
    Seek,
}

/// 再生制御コマンド
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackCommand {
    pub action: PlaybackAction,
    pub position: PlaybackPosition,
}

impl PlaybackCommand {
    pub fn new(action: PlaybackAction, position: PlaybackPosition) -> Self {
        Self { action, position }
    }
}

/// Room エンティティ
///
/// ## 不変条件
///
/// - ホスト枠は高々 1 つ
/// - 1 つの接続はホストと視聴者を兼ねない
/// - ホストも視聴者もいない Room は Repository に残らない（削除は Repository の責務）
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub host: Option<RoomMember>,
    /// 参加順の視聴者リスト
    pub viewers: Vec<RoomMember>,
    pub playback: PlaybackSnapshot,
    pub created_at: Timestamp,
}

/// Room への参加結果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// 参加処理後の Room
    pub room: Room,
    /// ホスト参加で上書きされた以前のホスト
    pub displaced_host: Option<RoomMember>,
    /// 現在のホストが視聴者として再参加し、空になったホスト枠の元の占有者
    pub vacated_host: Option<RoomMember>,
    /// 新たに追加された場合 true（同じ ID での再参加は false）
    pub newly_added: bool,
    /// ホスト参加によって動画 URL が変わった場合 true
    pub video_url_changed: bool,
}

/// Room からの退出結果
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    /// 退出したメンバー（すでに Room にいなかった場合は None）
    pub departed: Option<RoomMember>,
    /// 退出処理後の Room
    pub room: Room,
    /// 空になって削除された場合 true
    pub room_deleted: bool,
}

impl Room {
    /// 空の Room を作成（一時停止・位置 0・URL なし）
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            host: None,
            viewers: Vec::new(),
            playback: PlaybackSnapshot::default(),
            created_at,
        }
    }

    /// メンバーを参加させる
    ///
    /// ホストは既存のホストを無条件に上書きする。視聴者は ID に対して冪等。
    /// `video_url` はホスト参加の場合のみ反映される。
    pub fn join(&mut self, member: RoomMember, video_url: Option<VideoUrl>) -> JoinOutcome {
        let mut displaced_host = None;
        let mut vacated_host = None;
        let mut video_url_changed = false;

        let newly_added = match member.role {
            Role::Host => {
                self.viewers
                    .retain(|viewer| viewer.connection_id != member.connection_id);
                let connection_id = member.connection_id.clone();
                let previous = self.host.replace(member);
                let newly_added = previous
                    .as_ref()
                    .is_none_or(|prev| prev.connection_id != connection_id);
                displaced_host = previous.filter(|prev| prev.connection_id != connection_id);

                if let Some(url) = video_url
                    && self.playback.video_url.as_ref() != Some(&url)
                {
                    self.playback.video_url = Some(url);
                    video_url_changed = true;
                }
                newly_added
            }
            Role::Viewer => {
                if self.is_host(&member.connection_id) {
                    vacated_host = self.host.take();
                }
                if self.has_viewer(&member.connection_id) {
                    false
                } else {
                    self.viewers.push(member);
                    true
                }
            }
        };

        JoinOutcome {
            room: self.clone(),
            displaced_host,
            vacated_host,
            newly_added,
            video_url_changed,
        }
    }

    /// メンバーを退出させる
    ///
    /// ホスト枠は、その枠を現在占有している接続の場合のみ空になる。
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> Option<RoomMember> {
        if self.is_host(connection_id) {
            return self.host.take();
        }
        let index = self
            .viewers
            .iter()
            .position(|viewer| &viewer.connection_id == connection_id)?;
        Some(self.viewers.remove(index))
    }

    /// 再生制御を適用する（現在のホストのみ）
    pub fn apply_playback(
        &mut self,
        sender: &ConnectionId,
        command: PlaybackCommand,
    ) -> Result<PlaybackSnapshot, DomainError> {
        self.ensure_host(sender)?;

        match command.action {
            PlaybackAction::Play => {
                self.playback.is_playing = true;
                self.playback.position = command.position;
            }
            PlaybackAction::Pause => {
                self.playback.is_playing = false;
                self.playback.position = command.position;
            }
            PlaybackAction::Seek => {
                self.playback.position = command.position;
            }
        }

        Ok(self.playback.clone())
    }

    /// 動画 URL を記録する（現在のホストのみ）
    pub fn set_video_url(
        &mut self,
        sender: &ConnectionId,
        video_url: VideoUrl,
    ) -> Result<bool, DomainError> {
        self.ensure_host(sender)?;

        if self.playback.video_url.as_ref() == Some(&video_url) {
            return Ok(false);
        }
        self.playback.video_url = Some(video_url);
        Ok(true)
    }

    pub fn is_host(&self, connection_id: &ConnectionId) -> bool {
        self.host
            .as_ref()
            .is_some_and(|host| &host.connection_id == connection_id)
    }

    pub fn has_viewer(&self, connection_id: &ConnectionId) -> bool {
        self.viewers
            .iter()
            .any(|viewer| &viewer.connection_id == connection_id)
    }

    pub fn host_id(&self) -> Option<&ConnectionId> {
        self.host.as_ref().map(|host| &host.connection_id)
    }

    /// ホストも視聴者もいない
    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.viewers.is_empty()
    }

    /// 全メンバーの接続 ID（ホスト、視聴者の順）
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.host
            .iter()
            .chain(self.viewers.iter())
            .map(|member| member.connection_id.clone())
            .collect()
    }

    /// 指定した接続以外の全メンバーの接続 ID
    pub fn member_ids_except(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.member_ids()
            .into_iter()
            .filter(|id| id != exclude)
            .collect()
    }

    pub fn viewer_ids(&self) -> Vec<ConnectionId> {
        self.viewers
            .iter()
            .map(|viewer| viewer.connection_id.clone())
            .collect()
    }

    fn ensure_host(&self, sender: &ConnectionId) -> Result<(), DomainError> {
        if self.is_host(sender) {
            Ok(())
        } else {
            Err(DomainError::NotHost(sender.as_str().to_string()))
        }
    }
}

/// 接続が参加中の Room に関する情報
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    pub room_id: RoomId,
    pub role: Role,
    pub display_name: DisplayName,
    pub user_id: Option<UserId>,
}

/// 接続エンティティ
///
/// トランスポートの接続と同じ寿命を持ち、永続化されない。
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
    membership: Option<Membership>,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            membership: None,
        }
    }

    pub fn membership(&self) -> Option<&Membership> {
        self.membership.as_ref()
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        self.membership.as_ref().map(|m| &m.room_id)
    }

    pub fn role(&self) -> Option<Role> {
        self.membership.as_ref().map(|m| m.role)
    }

    pub fn enter(&mut self, membership: Membership) {
        self.membership = Some(membership);
    }

    pub fn leave(&mut self) -> Option<Membership> {
        self.membership.take()
    }
}

/// チャットメッセージ（履歴は保持しない）
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub from: ConnectionId,
    pub username: DisplayName,
    pub user_id: Option<UserId>,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}
