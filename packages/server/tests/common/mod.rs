//! In-process test harness: a server on an ephemeral port and WebSocket clients.

#![allow(dead_code)]

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpStream, sync::Mutex, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use watchroom_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, SendChatMessageUseCase,
        SyncPlaybackUseCase,
    },
};
use watchroom_shared::time::SystemClock;

const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Server running in a background task, aborted on drop
pub struct TestServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let clock = Arc::new(SystemClock);
        let leave_room = Arc::new(LeaveRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        ));
        let server = Server::new(
            Arc::new(ConnectParticipantUseCase::new(
                message_pusher.clone(),
                clock.clone(),
            )),
            Arc::new(DisconnectParticipantUseCase::new(
                leave_room.clone(),
                message_pusher.clone(),
            )),
            Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                leave_room,
                clock.clone(),
            )),
            Arc::new(SyncPlaybackUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            Arc::new(SendChatMessageUseCase::new(
                repository.clone(),
                message_pusher,
                clock,
            )),
            Arc::new(GetRoomsUseCase::new(repository.clone())),
            Arc::new(GetRoomDetailUseCase::new(repository)),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = server.router();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, handle }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// `GET /api/rooms/{room_id}`; `None` on 404
    pub async fn room(&self, room_id: &str) -> Option<Value> {
        let response = reqwest::get(self.http_url(&format!("/api/rooms/{}", room_id)))
            .await
            .unwrap();
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return None;
        }
        Some(response.json().await.unwrap())
    }

    /// Polls the room detail until `predicate` holds
    pub async fn wait_for_room<F>(&self, room_id: &str, predicate: F) -> Option<Value>
    where
        F: Fn(&Option<Value>) -> bool,
    {
        for _ in 0..100 {
            let room = self.room(room_id).await;
            if predicate(&room) {
                return room;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("room '{}' never reached the expected state", room_id);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// WebSocket client speaking the `{event, data}` envelope
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url()).await.unwrap();
        Self { stream }
    }

    /// Connects and joins, returning the assigned connection id
    pub async fn join(server: &TestServer, room_id: &str, role: &str, name: &str) -> (Self, String) {
        let mut client = Self::connect(server).await;
        client
            .send(
                "join",
                json!({"roomId": room_id, "role": role, "displayName": name}),
            )
            .await;
        let success = client.recv_event("join-success").await;
        let connection_id = success["connectionId"].as_str().unwrap().to_string();
        (client, connection_id)
    }

    pub async fn send(&mut self, event: &str, data: Value) {
        let frame = json!({"event": event, "data": data}).to_string();
        self.send_raw(&frame).await;
    }

    pub async fn send_raw(&mut self, frame: &str) {
        self.stream.send(Message::text(frame)).await.unwrap();
    }

    /// Next envelope as `(event, data)`
    pub async fn recv(&mut self) -> (String, Value) {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("stream closed")
                .unwrap();
            if let Message::Text(text) = msg {
                let envelope: Value = serde_json::from_str(text.as_str()).unwrap();
                let event = envelope["event"].as_str().unwrap().to_string();
                return (event, envelope["data"].clone());
            }
        }
    }

    /// Skips frames until `event` arrives and returns its data
    pub async fn recv_event(&mut self, event: &str) -> Value {
        loop {
            let (name, data) = self.recv().await;
            if name == event {
                return data;
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
