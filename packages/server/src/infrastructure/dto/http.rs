//! HTTP API response DTOs for the lobby.

use serde::{Deserialize, Serialize};

use crate::domain::{RoomSnapshot, RoomState};

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub code: String,
    pub players: Vec<String>,
    pub state: RoomState,
    pub created_at: String, // ISO 8601
}

impl From<&RoomSnapshot> for RoomSummaryDto {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            code: snapshot.code.to_string(),
            players: snapshot.player_names(),
            state: snapshot.state,
            created_at: lobby_shared::time::millis_to_jst_rfc3339(snapshot.created_at.value()),
        }
    }
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub code: String,
    pub state: RoomState,
    /// Display name of the host
    pub host: Option<String>,
    pub players: Vec<PlayerDetailDto>,
    pub created_at: String, // ISO 8601
}

impl From<&RoomSnapshot> for RoomDetailDto {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            code: snapshot.code.to_string(),
            state: snapshot.state,
            host: snapshot.host().map(|m| m.display_name.clone()),
            players: snapshot
                .members
                .iter()
                .map(|m| PlayerDetailDto {
                    display_name: m.display_name.clone(),
                    connected: m.connection.is_some(),
                })
                .collect(),
            created_at: lobby_shared::time::millis_to_jst_rfc3339(snapshot.created_at.value()),
        }
    }
}

/// Player detail for room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDetailDto {
    pub display_name: String,
    pub connected: bool,
}
