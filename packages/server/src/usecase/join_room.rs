//! UseCase: Room への参加処理
//!
//! ## 処理の流れ
//!
//! 1. 入力の検証（roomId / role がなければ `join-error` を返し、何も変更しない）
//! 2. 別の Room に参加中なら先に退出する
//! 3. Repository で Room を取得または作成し、メンバーを参加させる
//! 4. 参加者に `join-success`、役割ごとの通知、他のメンバーに `user-joined-chat`
//!
//! ホストが同じ Room に視聴者として再参加した場合、ホスト枠は空になり、
//! 他のメンバーに `user-left`（role: host）が送られる。
//!
//! ## 役割ごとの通知
//!
//! - ホスト: 自身に `viewers-list`。動画 URL が変わった場合は視聴者に `video-url-update`
//! - 視聴者: ホストがいればホストに `viewer-joined`・`viewers-list`・`request-video-state`。
//!   ホストの有無にかかわらず、視聴者にキャッシュ済みの `initial-sync`
//!
//! 視聴者は `initial-sync` を 2 回（キャッシュとホストからの応答）受け取ることがある。

use std::sync::Arc;

use watchroom_shared::time::Clock;

use crate::domain::{
    Connection, ConnectionId, DisplayName, Membership, MessagePusher, Notification, Role, Room,
    RoomId, RoomMember, RoomRepository, Timestamp, UserId, VideoUrl,
};

use super::{LeaveRoomUseCase, error::JoinRoomError, notify};

/// 参加リクエスト（ワイヤ上の値そのまま）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinRequest {
    pub room_id: Option<String>,
    pub role: Option<String>,
    pub display_name: Option<String>,
    pub user_id: Option<String>,
    pub video_url: Option<String>,
}

/// 検証済みの参加リクエスト
struct ValidatedJoin {
    room_id: RoomId,
    member: RoomMember,
    video_url: Option<VideoUrl>,
}

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 再参加時の退出処理
    leave_room: Arc<LeaveRoomUseCase>,
    /// 時刻の取得
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        leave_room: Arc<LeaveRoomUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            leave_room,
            clock,
        }
    }

    /// 参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 参加後の Room
    /// * `Err(JoinRoomError)` - 参加失敗（`join-error` は送信済み）
    pub async fn execute(
        &self,
        connection: &mut Connection,
        request: JoinRequest,
    ) -> Result<Room, JoinRoomError> {
        let validated = match validate(&connection.id, request) {
            Ok(validated) => validated,
            Err(e) => {
                tracing::debug!("Rejected join from '{}': {}", connection.id, e);
                self.reject(&connection.id, &e).await;
                return Err(e);
            }
        };

        let switching_rooms = connection
            .room_id()
            .is_some_and(|current| current != &validated.room_id);
        if switching_rooms {
            self.leave_room.execute(connection).await;
        }

        let ValidatedJoin {
            room_id,
            member,
            video_url,
        } = validated;
        let now = Timestamp::new(self.clock.now_millis());
        let outcome = match self
            .repository
            .join_room(&room_id, member.clone(), video_url, now)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                let e = JoinRoomError::Repository(e);
                tracing::warn!("Failed to join room '{}': {}", room_id, e);
                self.reject(&connection.id, &e).await;
                return Err(e);
            }
        };

        connection.enter(Membership {
            room_id: room_id.clone(),
            role: member.role,
            display_name: member.display_name.clone(),
            user_id: member.user_id.clone(),
        });

        if let Some(displaced) = &outcome.displaced_host {
            tracing::info!(
                "Host of room '{}' taken over: '{}' -> '{}'",
                room_id,
                displaced.connection_id,
                member.connection_id
            );
        }

        let room = outcome.room;
        let pusher = self.message_pusher.as_ref();

        // ホストが視聴者として再参加した場合、ホスト枠が空いたことを他のメンバーに知らせる
        if let Some(vacated) = &outcome.vacated_host {
            tracing::info!(
                "Host '{}' of room '{}' became a viewer",
                vacated.connection_id,
                room_id
            );
            notify::broadcast(
                pusher,
                room.member_ids_except(&member.connection_id),
                &Notification::UserLeft {
                    role: Role::Host,
                    connection_id: vacated.connection_id.clone(),
                },
            )
            .await;
        }

        notify::push(
            pusher,
            &member.connection_id,
            &Notification::JoinSuccess {
                room_id: room_id.clone(),
                role: member.role,
                connection_id: member.connection_id.clone(),
            },
        )
        .await;

        match member.role {
            Role::Host => {
                notify::push(
                    pusher,
                    &member.connection_id,
                    &Notification::ViewersList {
                        viewers: room.viewers.clone(),
                    },
                )
                .await;

                if outcome.video_url_changed
                    && let Some(video_url) = &room.playback.video_url
                {
                    notify::broadcast(
                        pusher,
                        room.viewer_ids(),
                        &Notification::VideoUrlUpdate {
                            video_url: video_url.clone(),
                        },
                    )
                    .await;
                }
            }
            Role::Viewer => {
                if let Some(host_id) = room.host_id() {
                    notify::push(
                        pusher,
                        host_id,
                        &Notification::ViewerJoined {
                            viewer_id: member.connection_id.clone(),
                            room_id: room_id.clone(),
                            username: member.display_name.clone(),
                        },
                    )
                    .await;
                    notify::push(
                        pusher,
                        host_id,
                        &Notification::ViewersList {
                            viewers: room.viewers.clone(),
                        },
                    )
                    .await;
                    notify::push(
                        pusher,
                        host_id,
                        &Notification::RequestVideoState {
                            viewer_id: member.connection_id.clone(),
                        },
                    )
                    .await;
                }

                notify::push(
                    pusher,
                    &member.connection_id,
                    &Notification::InitialSync {
                        snapshot: room.playback.clone(),
                    },
                )
                .await;
            }
        }

        if outcome.newly_added {
            notify::broadcast(
                pusher,
                room.member_ids_except(&member.connection_id),
                &Notification::UserJoinedChat {
                    member: member.clone(),
                    timestamp: now,
                },
            )
            .await;
        }

        tracing::info!(
            "Connection '{}' joined room '{}' as {}",
            member.connection_id,
            room_id,
            member.role
        );

        Ok(room)
    }

    async fn reject(&self, connection_id: &ConnectionId, error: &JoinRoomError) {
        notify::push(
            self.message_pusher.as_ref(),
            connection_id,
            &Notification::JoinError {
                message: error.to_string(),
            },
        )
        .await;
    }
}

/// 空白のみの文字列は未指定として扱う
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate(
    connection_id: &ConnectionId,
    request: JoinRequest,
) -> Result<ValidatedJoin, JoinRoomError> {
    let (Some(room_id), Some(role)) = (non_blank(request.room_id), non_blank(request.role)) else {
        return Err(JoinRoomError::MissingField);
    };

    let room_id = RoomId::new(room_id).map_err(JoinRoomError::Invalid)?;
    let role = Role::try_from(role.as_str()).map_err(JoinRoomError::Invalid)?;
    let display_name = match non_blank(request.display_name) {
        Some(name) => DisplayName::new(name).map_err(JoinRoomError::Invalid)?,
        None => DisplayName::anonymous(),
    };
    let user_id = non_blank(request.user_id)
        .map(UserId::new)
        .transpose()
        .map_err(JoinRoomError::Invalid)?;
    let video_url = match role {
        Role::Host => non_blank(request.video_url)
            .map(VideoUrl::new)
            .transpose()
            .map_err(JoinRoomError::Invalid)?,
        Role::Viewer => None,
    };

    Ok(ValidatedJoin {
        room_id,
        member: RoomMember::new(connection_id.clone(), display_name, user_id, role),
        video_url,
    })
}
