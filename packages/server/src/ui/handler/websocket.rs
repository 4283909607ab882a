//! WebSocket connection handlers.
//!
//! Each connection runs one receive loop that dispatches inbound events to the
//! use cases in arrival order, plus one pusher task that drains the connection's
//! outbound channel into the socket.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::Connection,
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::{ChatRequest, JoinRequest},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives encoded frames from the rx channel and pushes them to the WebSocket sender.
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    let mut connection = match state.connect_participant_usecase.execute(tx).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Failed to accept connection: {}", e);
            return;
        }
    };
    tracing::info!("Connection '{}' established", connection.id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let msg = match incoming {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on '{}': {}", connection.id, e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => {
                        handle_client_message(&state, &mut connection, &text).await;
                    }
                    Message::Close(_) => {
                        tracing::debug!("Connection '{}' requested close", connection.id);
                        break;
                    }
                    // Ping/pong is handled automatically by the WebSocket protocol
                    _ => {}
                }
            }
            _ = &mut send_task => {
                tracing::debug!("Outbound channel of '{}' closed", connection.id);
                break;
            }
        }
    }

    send_task.abort();
    state
        .disconnect_participant_usecase
        .execute(connection)
        .await;
}

/// Parses one inbound frame and dispatches it.
///
/// Rejected requests are logged and dropped; only `join` reports failures back
/// to the sender (the use case pushes `join-error` itself).
async fn handle_client_message(state: &AppState, connection: &mut Connection, text: &str) {
    let message = match ClientMessage::from_frame(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Ignoring unparseable frame from '{}': {}", connection.id, e);
            return;
        }
    };

    match message {
        ClientMessage::Join(payload) => {
            let request = JoinRequest {
                room_id: payload.room_id,
                role: payload.role,
                display_name: payload.display_name,
                user_id: payload.user_id,
                video_url: payload.video_url,
            };
            // join-error has already been pushed on failure
            let _ = state.join_room_usecase.execute(connection, request).await;
        }
        ClientMessage::SyncEvent(payload) => {
            if let Err(e) = state
                .sync_playback_usecase
                .execute(connection, payload.r#type.into(), payload.current_time)
                .await
            {
                tracing::debug!("Dropped sync-event from '{}': {}", connection.id, e);
            }
        }
        ClientMessage::SendVideoState(payload) => {
            if let Err(e) = state
                .sync_playback_usecase
                .relay_video_state(
                    connection,
                    payload.viewer_id,
                    payload.is_playing,
                    payload.current_time,
                )
                .await
            {
                tracing::debug!("Dropped send-video-state from '{}': {}", connection.id, e);
            }
        }
        ClientMessage::SendVideoUrl(payload) => {
            if let Err(e) = state
                .sync_playback_usecase
                .relay_video_url(connection, payload.viewer_id, payload.video_url)
                .await
            {
                tracing::debug!("Dropped send-video-url from '{}': {}", connection.id, e);
            }
        }
        ClientMessage::SendChatMessage(payload) => {
            let request = ChatRequest {
                message: payload.message,
                username: payload.username,
                user_id: payload.user_id,
            };
            if let Err(e) = state
                .send_chat_message_usecase
                .execute(connection, request)
                .await
            {
                tracing::debug!("Dropped chat message from '{}': {}", connection.id, e);
            }
        }
    }
}
