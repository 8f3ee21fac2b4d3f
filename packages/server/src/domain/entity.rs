//! Core domain models for the lobby.

use serde::{Deserialize, Serialize};

use super::{
    connection::ConnectionHandle,
    error::RoomError,
    value_object::{DisplayName, RoomCode, SessionToken, Timestamp},
};

/// Minimum number of members required to start a game
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Coarse room lifecycle flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    Lobby,
    Playing,
}

/// One logical participant. Survives disconnects; only the sweeper deletes it.
#[derive(Debug, Clone)]
pub struct Player {
    /// Bearer credential used to resume this player
    pub token: SessionToken,
    /// Name shown to the room, set on create/join
    pub display_name: Option<DisplayName>,
    /// Room this player belongs to, if any
    pub room_code: Option<RoomCode>,
    /// Live socket, absent while disconnected
    pub connection: Option<ConnectionHandle>,
    /// Last reconnect or request; drives expiry
    pub last_active_at: Timestamp,
}

impl Player {
    /// Create a roomless player attached to `connection`
    pub fn new(token: SessionToken, connection: ConnectionHandle, now: Timestamp) -> Self {
        Self {
            token,
            display_name: None,
            room_code: None,
            connection: Some(connection),
            last_active_at: now,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Name to show in room listings
    pub fn name_or_default(&self) -> String {
        self.display_name
            .as_ref()
            .map(|n| n.as_str().to_string())
            .unwrap_or_default()
    }
}

/// Result of removing a member from a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    /// The token was not a member
    NotMember,
    /// The last member left; the room must be deleted
    Emptied,
    /// Members remain; `new_host` is set when the host was the one leaving
    Remaining { new_host: Option<SessionToken> },
}

/// A game lobby.
///
/// Members are kept in join order. The host is always one of the members, and
/// a room never exists with zero members: [`Room::remove_member`] reports
/// [`Departure::Emptied`] and the registry drops the room.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    host: SessionToken,
    members: Vec<SessionToken>,
    state: RoomState,
    created_at: Timestamp,
}

impl Room {
    /// Create a room in the lobby state with `host` as its only member
    pub fn new(code: RoomCode, host: SessionToken, created_at: Timestamp) -> Self {
        Self {
            code,
            members: vec![host.clone()],
            host,
            state: RoomState::Lobby,
            created_at,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn host(&self) -> &SessionToken {
        &self.host
    }

    /// Members in join order
    pub fn members(&self) -> &[SessionToken] {
        &self.members
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, token: &SessionToken) -> bool {
        self.members.contains(token)
    }

    pub fn is_host(&self, token: &SessionToken) -> bool {
        &self.host == token
    }

    /// Add a member. Returns false if the token was already a member.
    pub fn add_member(&mut self, token: SessionToken) -> bool {
        if self.contains(&token) {
            return false;
        }
        self.members.push(token);
        true
    }

    /// Remove a member, handing the host role to the earliest-joined remaining
    /// member when the host leaves.
    pub fn remove_member(&mut self, token: &SessionToken) -> Departure {
        let Some(pos) = self.members.iter().position(|m| m == token) else {
            return Departure::NotMember;
        };
        self.members.remove(pos);

        let Some(first) = self.members.first() else {
            return Departure::Emptied;
        };

        if &self.host == token {
            self.host = first.clone();
            Departure::Remaining {
                new_host: Some(self.host.clone()),
            }
        } else {
            Departure::Remaining { new_host: None }
        }
    }

    /// Move the room into the playing state
    ///
    /// # Errors
    ///
    /// Returns `RoomError::NotEnoughPlayers` with fewer than two members
    pub fn start_game(&mut self) -> Result<(), RoomError> {
        if self.members.len() < MIN_PLAYERS_TO_START {
            return Err(RoomError::NotEnoughPlayers {
                required: MIN_PLAYERS_TO_START,
                current: self.members.len(),
            });
        }
        self.state = RoomState::Playing;
        Ok(())
    }
}
