//! WebSocket client session management.
//!
//! [`Session`] holds the per-connection state and decides what to print and
//! what to send for every inbound event, prompt line and heartbeat tick.
//! [`run_client_session`] only moves frames between it and the socket.

use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::{sync::mpsc, time::MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use watchroom_server::{
    domain::PlaybackAction,
    infrastructure::dto::websocket::{
        ClientMessage, JoinPayload, SendChatMessagePayload, SendVideoStatePayload,
        SendVideoUrlPayload, ServerMessage, SyncEventPayload, SyncEventType, ViewerInfo,
    },
};

use crate::{
    domain::{ClientRole, Command, HELP, parse_command},
    error::ClientError,
    formatter::MessageFormatter,
    player::LocalPlayer,
    ui::redisplay_prompt,
};

/// Interval at which a playing host re-announces its position
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Connection settings given on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub url: String,
    pub room_id: String,
    pub role: ClientRole,
    pub display_name: String,
    pub user_id: Option<String>,
    /// Initial video url; only sent when joining as host
    pub video_url: Option<String>,
}

impl SessionConfig {
    /// Prompt shown by the line editor, e.g. `alice@movie-night`
    pub fn prompt(&self) -> String {
        format!("{}@{}", self.display_name, self.room_id)
    }
}

/// What to do in response to one input
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Reaction {
    pub display: Option<String>,
    pub replies: Vec<ClientMessage>,
}

impl Reaction {
    fn display(text: String) -> Self {
        Self {
            display: Some(text),
            replies: Vec::new(),
        }
    }

    fn reply(mut self, message: ClientMessage) -> Self {
        self.replies.push(message);
        self
    }
}

/// State of one connection to the server
pub(crate) struct Session<'a> {
    config: &'a SessionConfig,
    player: &'a mut LocalPlayer,
    viewers: Vec<ViewerInfo>,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a SessionConfig, player: &'a mut LocalPlayer) -> Self {
        if config.role == ClientRole::Host
            && player.video_url().is_none()
            && let Some(video_url) = &config.video_url
        {
            player.set_video_url(video_url.clone());
        }

        Self {
            config,
            player,
            viewers: Vec::new(),
        }
    }

    fn is_host(&self) -> bool {
        self.config.role == ClientRole::Host
    }

    /// The `join` sent right after connecting
    pub fn join_message(&self) -> ClientMessage {
        let video_url = if self.is_host() {
            self.player.video_url().map(str::to_string)
        } else {
            None
        };

        ClientMessage::Join(JoinPayload {
            room_id: Some(self.config.room_id.clone()),
            role: Some(self.config.role.as_str().to_string()),
            display_name: Some(self.config.display_name.clone()),
            user_id: self.config.user_id.clone(),
            video_url,
        })
    }

    pub fn on_server_message(
        &mut self,
        message: ServerMessage,
        now: Instant,
    ) -> Result<Reaction, ClientError> {
        let reaction = match message {
            ServerMessage::JoinSuccess(payload) => {
                tracing::info!(
                    "Joined room '{}' as {} ({})",
                    payload.room_id,
                    payload.role,
                    payload.connection_id
                );
                Reaction::display(MessageFormatter::format_join_success(
                    &payload.room_id,
                    &payload.role,
                    &payload.connection_id,
                ))
            }
            ServerMessage::JoinError(payload) => {
                return Err(ClientError::JoinRejected(payload.message));
            }
            ServerMessage::ViewerJoined(payload) => Reaction::display(
                MessageFormatter::format_viewer_joined(&payload.username, &payload.viewer_id),
            ),
            ServerMessage::ViewersList(payload) => {
                let text = MessageFormatter::format_viewers_list(&payload.viewers);
                self.viewers = payload.viewers;
                Reaction::display(text)
            }
            ServerMessage::RequestVideoState(payload) => {
                self.answer_video_state(payload.viewer_id, now)
            }
            ServerMessage::InitialSync(payload) => {
                self.player.apply_initial_sync(
                    payload.is_playing,
                    payload.current_time,
                    payload.video_url,
                    now,
                );
                Reaction::display(MessageFormatter::format_initial_sync(
                    payload.is_playing,
                    payload.current_time,
                    self.player.video_url(),
                ))
            }
            ServerMessage::VideoUrlUpdate(payload) => {
                let text = MessageFormatter::format_video_url_update(&payload.video_url);
                self.player.set_video_url(payload.video_url);
                Reaction::display(text)
            }
            ServerMessage::SyncEvent(payload) => {
                let action: PlaybackAction = payload.r#type.into();
                let reconciliation = self.player.apply_sync(action, payload.current_time, now);
                tracing::debug!(
                    "Applied {:?} at {}: {:?}",
                    action,
                    payload.current_time,
                    reconciliation
                );
                Reaction::display(MessageFormatter::format_sync(
                    reconciliation,
                    self.player.position(now),
                ))
            }
            ServerMessage::ChatMessage(payload) => Reaction::display(
                MessageFormatter::format_chat_message(
                    &payload.username,
                    &payload.message,
                    payload.timestamp,
                ),
            ),
            ServerMessage::UserJoinedChat(payload) => {
                Reaction::display(MessageFormatter::format_chat_presence(
                    &payload.username,
                    &payload.role,
                    true,
                    payload.timestamp,
                ))
            }
            ServerMessage::UserLeftChat(payload) => {
                Reaction::display(MessageFormatter::format_chat_presence(
                    &payload.username,
                    &payload.role,
                    false,
                    payload.timestamp,
                ))
            }
            ServerMessage::UserLeft(payload) => Reaction::display(
                MessageFormatter::format_user_left(&payload.role, &payload.connection_id),
            ),
        };

        Ok(reaction)
    }

    /// Reply to `request-video-state` with the local state (host only)
    fn answer_video_state(&self, viewer_id: String, now: Instant) -> Reaction {
        if !self.is_host() {
            tracing::debug!("Ignoring request-video-state as a viewer");
            return Reaction::default();
        }

        let mut reaction = Reaction::default().reply(ClientMessage::SendVideoState(
            SendVideoStatePayload {
                viewer_id: viewer_id.clone(),
                is_playing: self.player.is_playing(),
                current_time: self.player.position(now),
            },
        ));
        if let Some(video_url) = self.player.video_url() {
            reaction = reaction.reply(ClientMessage::SendVideoUrl(SendVideoUrlPayload {
                viewer_id,
                video_url: video_url.to_string(),
            }));
        }
        reaction
    }

    /// Apply a parsed prompt command. `Command::Quit` is handled by the caller.
    pub fn on_command(&mut self, command: Command, now: Instant) -> Reaction {
        match command {
            Command::Play(from) => {
                self.player.play(from, now);
                self.playback_reaction(SyncEventType::Play, now)
            }
            Command::Pause => {
                self.player.pause(now);
                self.playback_reaction(SyncEventType::Pause, now)
            }
            Command::Seek(position) => {
                self.player.seek(position, now);
                self.playback_reaction(SyncEventType::Seek, now)
            }
            Command::Url(video_url) => {
                self.player.set_video_url(video_url.clone());
                let mut reaction =
                    Reaction::display(MessageFormatter::format_video_url_update(&video_url));
                for viewer in &self.viewers {
                    reaction = reaction.reply(ClientMessage::SendVideoUrl(SendVideoUrlPayload {
                        viewer_id: viewer.id.clone(),
                        video_url: video_url.clone(),
                    }));
                }
                reaction
            }
            Command::Status => Reaction::display(MessageFormatter::format_status(
                self.player.is_playing(),
                self.player.position(now),
                self.player.video_url(),
            )),
            Command::Help => Reaction::display(format!("\n{}\n", HELP)),
            Command::Quit => Reaction::default(),
            Command::Chat(message) => {
                Reaction::default().reply(ClientMessage::SendChatMessage(SendChatMessagePayload {
                    message,
                    username: None,
                    user_id: None,
                }))
            }
        }
    }

    fn playback_reaction(&self, r#type: SyncEventType, now: Instant) -> Reaction {
        let current_time = self.player.position(now);
        Reaction::default().reply(ClientMessage::SyncEvent(SyncEventPayload {
            r#type,
            current_time,
        }))
    }

    /// Periodic `play` re-announcement while the host is playing
    pub fn heartbeat(&self, now: Instant) -> Option<ClientMessage> {
        if !self.is_host() || !self.player.is_playing() {
            return None;
        }
        Some(ClientMessage::SyncEvent(SyncEventPayload {
            r#type: SyncEventType::Play,
            current_time: self.player.position(now),
        }))
    }
}

/// Serialize and send one event.
async fn send_message<S>(write: &mut S, message: &ClientMessage) -> Result<(), ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            return Ok(());
        }
    };

    write.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::warn!("Failed to send message: {}", e);
        ClientError::ConnectionError(e.to_string())
    })
}

/// Run the WebSocket client session
///
/// Returns `Ok(())` when the user quits, and an error when the join is
/// rejected or the connection drops.
pub(crate) async fn run_client_session(
    config: &SessionConfig,
    player: &mut LocalPlayer,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(config.url.as_str())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to {}", config.url);

    let (mut write, mut read) = ws_stream.split();
    let prompt = config.prompt();
    let mut session = Session::new(config, player);

    send_message(&mut write, &session.join_message()).await?;

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    heartbeat.tick().await;

    loop {
        tokio::select! {
            incoming = read.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed the connection");
                        return Err(ClientError::ConnectionError(
                            "Connection lost".to_string(),
                        ));
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                    // Ping/pong is answered by tungstenite
                    Some(Ok(_)) => continue,
                };

                let reaction = match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(message) => session.on_server_message(message, Instant::now())?,
                    Err(_) => Reaction::display(MessageFormatter::format_raw_message(&text)),
                };
                if let Some(display) = &reaction.display {
                    print!("{}", display);
                    redisplay_prompt(&prompt);
                }
                for reply in &reaction.replies {
                    send_message(&mut write, reply).await?;
                }
            }
            line = input_rx.recv() => {
                // Ctrl+C / Ctrl+D closes the input channel
                let Some(line) = line else {
                    write.close().await.ok();
                    return Ok(());
                };

                let command = match parse_command(&line, config.role) {
                    Ok(Command::Quit) => {
                        write.close().await.ok();
                        return Ok(());
                    }
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        redisplay_prompt(&prompt);
                        continue;
                    }
                };

                let reaction = session.on_command(command, Instant::now());
                for reply in &reaction.replies {
                    send_message(&mut write, reply).await?;
                }
                if let Some(display) = &reaction.display {
                    print!("{}", display);
                }
                redisplay_prompt(&prompt);
            }
            _ = heartbeat.tick() => {
                if let Some(message) = session.heartbeat(Instant::now()) {
                    send_message(&mut write, &message).await?;
                }
            }
        }
    }
}
