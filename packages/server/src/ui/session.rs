//! Per-connection request dispatch.
//!
//! A connection starts unannounced and only becomes able to act on rooms once
//! it has sent `announce`. Every request gets its direct reply on the
//! connection's own outbox before any room broadcast it triggers, so the
//! requester always sees its acknowledgment first.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    domain::{
        ConnectionHandle, DisplayName, LeaveOutcome, LobbyError, LobbyRepository, RoomCode,
        SessionToken,
    },
    infrastructure::dto::websocket::{
        ClientMessage, ErrorMessage, GameStartedMessage, JoinedRoomMessage, LeftRoomMessage,
        MessageType, RequestType, SessionMessage,
    },
    usecase::{
        AnnounceUseCase, CreateRoomUseCase, DisconnectUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        StartGameUseCase, broadcast_room_state,
    },
};

enum Phase {
    Unannounced,
    Announced { token: SessionToken },
}

/// State machine for one WebSocket connection
pub struct ConnectionSession {
    repository: Arc<dyn LobbyRepository>,
    connection: ConnectionHandle,
    phase: Phase,
}

impl ConnectionSession {
    pub fn new(repository: Arc<dyn LobbyRepository>, connection: ConnectionHandle) -> Self {
        Self {
            repository,
            connection,
            phase: Phase::Unannounced,
        }
    }

    /// The session token once announced
    pub fn token(&self) -> Option<&SessionToken> {
        match &self.phase {
            Phase::Unannounced => None,
            Phase::Announced { token } => Some(token),
        }
    }

    /// Decode and dispatch one inbound text frame.
    pub async fn handle_text(&mut self, text: &str) {
        let message = match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping undecodable request");
                return;
            }
        };
        self.handle(message).await;
    }

    pub async fn handle(&mut self, message: ClientMessage) {
        if message.r#type == RequestType::Unknown {
            tracing::debug!("Ignoring request with unknown type");
            return;
        }

        let Some(token) = self.token().cloned() else {
            if message.r#type == RequestType::Announce {
                self.announce(&message.session_token).await;
            } else {
                tracing::debug!(request = ?message.r#type, "Request before announce");
                self.send_error(&LobbyError::NoSuchSession).await;
            }
            return;
        };

        match message.r#type {
            RequestType::Announce => self.reannounce(&token).await,
            RequestType::CreateRoom => self.create_room(&token, message.display_name).await,
            RequestType::JoinRoom => {
                self.join_room(&token, message.room_code, message.display_name)
                    .await
            }
            RequestType::LeaveRoom => self.leave_room(&token).await,
            RequestType::StartGame => self.start_game(&token).await,
            RequestType::Unknown => {}
        }
    }

    /// Detach this connection from its session and show the player offline.
    pub async fn close(self) {
        let Phase::Announced { token } = self.phase else {
            return;
        };
        let usecase = DisconnectUseCase::new(self.repository.clone());
        if let Some(snapshot) = usecase.execute(&token, self.connection.id()).await {
            broadcast_room_state(&snapshot);
        }
    }

    async fn announce(&mut self, raw_token: &str) {
        let usecase = AnnounceUseCase::new(self.repository.clone());
        let announcement = usecase.execute(raw_token, self.connection.clone()).await;
        let token = announcement.player.token.clone();
        // Recorded before the reply await so close() always detaches the handle
        self.phase = Phase::Announced {
            token: token.clone(),
        };

        self.send(&SessionMessage {
            r#type: MessageType::Session,
            session_token: token.as_str().to_string(),
            resumed: announcement.resumed,
            room_code: announcement
                .room
                .as_ref()
                .map(|room| room.code.as_str().to_string()),
        })
        .await;

        if let Some(room) = &announcement.room {
            broadcast_room_state(room);
        }
    }

    async fn reannounce(&self, token: &SessionToken) {
        AnnounceUseCase::new(self.repository.clone())
            .refresh(token)
            .await;
        let room_code = self
            .repository
            .lookup(token)
            .await
            .and_then(|player| player.room_code)
            .map(|code| code.as_str().to_string());

        self.send(&SessionMessage {
            r#type: MessageType::Session,
            session_token: token.as_str().to_string(),
            resumed: true,
            room_code,
        })
        .await;
    }

    async fn create_room(&self, token: &SessionToken, display_name: String) {
        let display_name = match DisplayName::new(display_name) {
            Ok(name) => name,
            Err(e) => return self.send_error(&LobbyError::from(e)).await,
        };

        let usecase = CreateRoomUseCase::new(self.repository.clone());
        match usecase.execute(token, display_name).await {
            Ok(snapshot) => {
                self.send(&JoinedRoomMessage::new(&snapshot, token)).await;
                broadcast_room_state(&snapshot);
            }
            Err(e) => self.send_error(&e).await,
        }
    }

    async fn join_room(&self, token: &SessionToken, room_code: String, display_name: String) {
        let parsed = RoomCode::new(room_code)
            .and_then(|code| DisplayName::new(display_name).map(|name| (code, name)));
        let (code, display_name) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => return self.send_error(&LobbyError::from(e)).await,
        };

        let usecase = JoinRoomUseCase::new(self.repository.clone());
        match usecase.execute(&code, token, display_name).await {
            Ok(snapshot) => {
                self.send(&JoinedRoomMessage::new(&snapshot, token)).await;
                broadcast_room_state(&snapshot);
            }
            Err(e) => self.send_error(&e).await,
        }
    }

    async fn leave_room(&self, token: &SessionToken) {
        let usecase = LeaveRoomUseCase::new(self.repository.clone());
        match usecase.execute(token).await {
            Ok(LeaveOutcome::AlreadyLeft) => {
                self.send(&LeftRoomMessage {
                    r#type: MessageType::LeftRoom,
                    room_code: None,
                })
                .await;
            }
            Ok(LeaveOutcome::Left { code, remaining }) => {
                self.send(&LeftRoomMessage {
                    r#type: MessageType::LeftRoom,
                    room_code: Some(code.as_str().to_string()),
                })
                .await;
                if let Some(snapshot) = remaining {
                    broadcast_room_state(&snapshot);
                }
            }
            Err(e) => self.send_error(&e).await,
        }
    }

    async fn start_game(&self, token: &SessionToken) {
        let usecase = StartGameUseCase::new(self.repository.clone());
        match usecase.execute(token).await {
            Ok(snapshot) => {
                self.send(&GameStartedMessage {
                    r#type: MessageType::GameStarted,
                    room_code: snapshot.code.as_str().to_string(),
                    state: snapshot.state,
                })
                .await;
                broadcast_room_state(&snapshot);
            }
            Err(e) => self.send_error(&e).await,
        }
    }

    async fn send_error(&self, error: &LobbyError) {
        self.send(&ErrorMessage::from(error)).await;
    }

    async fn send<T: Serialize>(&self, message: &T) {
        let json = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode reply");
                return;
            }
        };
        if let Err(e) = self.connection.reply(json).await {
            tracing::debug!(error = %e, "Dropping reply for closed connection");
        }
    }
}
