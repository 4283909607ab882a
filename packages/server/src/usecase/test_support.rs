//! Test helpers shared by the use case tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use watchroom_shared::time::FixedClock;

use crate::{
    domain::{
        Connection, ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel,
        Timestamp,
    },
    infrastructure::repository::InMemoryRoomRepository,
};

use super::{
    JoinRequest, JoinRoomUseCase, LeaveRoomUseCase, SendChatMessageUseCase, SyncPlaybackUseCase,
};

pub(crate) const NOW: i64 = 1_700_000_000_000;

/// Records every notification instead of sending it.
#[derive(Default)]
pub(crate) struct RecordingPusher {
    sent: Mutex<Vec<(ConnectionId, Notification)>>,
    registered: Mutex<HashSet<ConnectionId>>,
}

impl RecordingPusher {
    /// Notifications received by one connection, in order.
    pub(crate) fn sent_to(&self, connection_id: &ConnectionId) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _)| target == connection_id)
            .map(|(_, notification)| notification.clone())
            .collect()
    }

    pub(crate) fn total_sent(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub(crate) fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub(crate) fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.registered.lock().unwrap().contains(connection_id)
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, connection_id: ConnectionId, _sender: PusherChannel) {
        self.registered.lock().unwrap().insert(connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.registered.lock().unwrap().remove(connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        self.sent
            .lock()
            .unwrap()
            .push((connection_id.clone(), notification.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let mut sent = self.sent.lock().unwrap();
        for target in targets {
            sent.push((target, notification.clone()));
        }
        Ok(())
    }
}

/// In-memory repository, recording pusher and a fixed clock wired into the use cases.
pub(crate) struct Fixture {
    pub(crate) repository: Arc<InMemoryRoomRepository>,
    pub(crate) pusher: Arc<RecordingPusher>,
    pub(crate) join: JoinRoomUseCase,
    pub(crate) leave: Arc<LeaveRoomUseCase>,
    pub(crate) sync: SyncPlaybackUseCase,
    pub(crate) chat: SendChatMessageUseCase,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(RecordingPusher::default());
        let clock = Arc::new(FixedClock::new(NOW));
        let leave = Arc::new(LeaveRoomUseCase::new(
            repository.clone(),
            pusher.clone(),
            clock.clone(),
        ));
        let join = JoinRoomUseCase::new(
            repository.clone(),
            pusher.clone(),
            leave.clone(),
            clock.clone(),
        );
        let sync = SyncPlaybackUseCase::new(repository.clone(), pusher.clone());
        let chat = SendChatMessageUseCase::new(repository.clone(), pusher.clone(), clock);
        Self {
            repository,
            pusher,
            join,
            leave,
            sync,
            chat,
        }
    }

    /// Joins a fresh connection and clears the recorded notifications.
    pub(crate) async fn joined(&self, id: &str, room: &str, role: &str) -> Connection {
        let mut connection = connection(id);
        self.join
            .execute(&mut connection, join_request(room, role, id))
            .await
            .unwrap();
        self.pusher.clear();
        connection
    }
}

pub(crate) fn connection_id(value: &str) -> ConnectionId {
    ConnectionId::new(value.to_string()).unwrap()
}

pub(crate) fn connection(id: &str) -> Connection {
    Connection::new(connection_id(id), Timestamp::new(NOW))
}

pub(crate) fn join_request(room: &str, role: &str, name: &str) -> JoinRequest {
    JoinRequest {
        room_id: Some(room.to_string()),
        role: Some(role.to_string()),
        display_name: Some(name.to_string()),
        user_id: None,
        video_url: None,
    }
}
