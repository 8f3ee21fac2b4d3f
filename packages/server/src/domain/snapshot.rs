//! Point-in-time copies of room state, taken under lock and used after release.

use std::collections::HashMap;

use super::{
    connection::ConnectionHandle,
    entity::{Player, Room, RoomState},
    value_object::{RoomCode, SessionToken, Timestamp},
};

/// One member as seen by a broadcast
#[derive(Debug, Clone)]
pub struct MemberSnapshot {
    pub token: SessionToken,
    pub display_name: String,
    pub is_host: bool,
    pub connection: Option<ConnectionHandle>,
}

/// Everything a broadcast needs, detached from the registry.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub code: RoomCode,
    pub state: RoomState,
    pub created_at: Timestamp,
    /// Members in join order
    pub members: Vec<MemberSnapshot>,
}

impl RoomSnapshot {
    /// Copy `room` and the matching player rows out of the registry.
    ///
    /// Members whose player row is missing are skipped.
    pub fn capture(room: &Room, players: &HashMap<SessionToken, Player>) -> Self {
        let members = room
            .members()
            .iter()
            .filter_map(|token| players.get(token))
            .map(|player| MemberSnapshot {
                token: player.token.clone(),
                display_name: player.name_or_default(),
                is_host: room.is_host(&player.token),
                connection: player.connection.clone(),
            })
            .collect();

        Self {
            code: room.code().clone(),
            state: room.state(),
            created_at: room.created_at(),
            members,
        }
    }

    /// Display names of every member, in join order
    pub fn player_names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.display_name.clone()).collect()
    }

    /// Display names of members without a live connection
    pub fn offline_names(&self) -> Vec<String> {
        self.members
            .iter()
            .filter(|m| m.connection.is_none())
            .map(|m| m.display_name.clone())
            .collect()
    }

    pub fn host(&self) -> Option<&MemberSnapshot> {
        self.members.iter().find(|m| m.is_host)
    }

    pub fn member(&self, token: &SessionToken) -> Option<&MemberSnapshot> {
        self.members.iter().find(|m| &m.token == token)
    }

    pub fn is_host(&self, token: &SessionToken) -> bool {
        self.member(token).is_some_and(|m| m.is_host)
    }
}
