//! WebSocket message DTOs for the lobby.
//!
//! Field names are camelCase on the wire. Inbound fields are all optional and
//! default to empty strings; the session handler validates them.

use serde::{Deserialize, Serialize};

use crate::domain::{LobbyError, MemberSnapshot, RoomSnapshot, RoomState, SessionToken};

/// Inbound request type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestType {
    Announce,
    CreateRoom,
    JoinRoom,
    LeaveRoom,
    StartGame,
    /// Anything this server does not know; logged and ignored
    #[serde(other)]
    Unknown,
}

/// Request sent by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    pub r#type: RequestType,
    #[serde(default)]
    pub session_token: String,
    #[serde(default)]
    pub room_code: String,
    #[serde(default)]
    pub display_name: String,
}

/// Outbound message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    Session,
    JoinedRoom,
    RoomState,
    FailedJoin,
    LeftRoom,
    GameStarted,
    NotInRoom,
    NotEnoughPlayers,
    Error,
}

/// Reply to announce
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMessage {
    pub r#type: MessageType,
    pub session_token: String,
    pub resumed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_code: Option<String>,
}

/// Reply to a successful create or join
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRoomMessage {
    pub r#type: MessageType,
    pub room_code: String,
    pub session_token: String,
    pub room_owner: bool,
    pub players: Vec<String>,
    pub state: RoomState,
}

impl JoinedRoomMessage {
    pub fn new(snapshot: &RoomSnapshot, token: &SessionToken) -> Self {
        Self {
            r#type: MessageType::JoinedRoom,
            room_code: snapshot.code.to_string(),
            session_token: token.to_string(),
            room_owner: snapshot.is_host(token),
            players: snapshot.player_names(),
            state: snapshot.state,
        }
    }
}

/// Room snapshot pushed to every connected member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateMessage {
    pub r#type: MessageType,
    pub room_code: String,
    /// Whether the recipient is the host
    pub room_owner: bool,
    /// All members in join order
    pub players: Vec<String>,
    /// Members currently without a live connection
    pub offline: Vec<String>,
    pub state: RoomState,
}

impl RoomStateMessage {
    pub fn for_member(snapshot: &RoomSnapshot, member: &MemberSnapshot) -> Self {
        Self {
            r#type: MessageType::RoomState,
            room_code: snapshot.code.to_string(),
            room_owner: member.is_host,
            players: snapshot.player_names(),
            offline: snapshot.offline_names(),
            state: snapshot.state,
        }
    }
}

/// Reply to leave
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftRoomMessage {
    pub r#type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_code: Option<String>,
}

/// Reply to a successful start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStartedMessage {
    pub r#type: MessageType,
    pub room_code: String,
    pub state: RoomState,
}

/// Typed failure reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub error: String,
}

impl From<&LobbyError> for ErrorMessage {
    fn from(e: &LobbyError) -> Self {
        let r#type = match e {
            LobbyError::RoomNotFound | LobbyError::AlreadyInRoom => MessageType::FailedJoin,
            LobbyError::NotInRoom => MessageType::NotInRoom,
            LobbyError::NotEnoughPlayers => MessageType::NotEnoughPlayers,
            LobbyError::NoSuchSession | LobbyError::MalformedRequest(_) => MessageType::Error,
        };
        Self {
            r#type,
            error: e.to_string(),
        }
    }
}
