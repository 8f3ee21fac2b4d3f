//! Registry contract.
//!
//! The use case layer depends on this trait; the in-memory implementation
//! lives in the infrastructure layer. Every method that mutates a room returns
//! a [`RoomSnapshot`] taken under lock so the caller can broadcast it after the
//! locks are released.

use async_trait::async_trait;

use super::{
    connection::ConnectionHandle,
    entity::Player,
    error::LobbyError,
    snapshot::RoomSnapshot,
    value_object::{ConnectionId, DisplayName, RoomCode, SessionToken, Timestamp},
};

/// Result of attaching a connection to a session
#[derive(Debug, Clone)]
pub struct Announcement {
    /// The player row after the connection was attached
    pub player: Player,
    /// True when an existing session was resumed
    pub resumed: bool,
    /// The player's room, when a resumed player is still a member of one
    pub room: Option<RoomSnapshot>,
}

/// Result of a leave request
#[derive(Debug, Clone)]
pub enum LeaveOutcome {
    /// The player had no room
    AlreadyLeft,
    /// The player left `code`; `remaining` is `None` when the room was deleted
    Left {
        code: RoomCode,
        remaining: Option<RoomSnapshot>,
    },
}

/// Result of one expiry pass
#[derive(Debug, Clone, Default)]
pub struct Expiry {
    /// Sessions that were deleted
    pub expired: Vec<SessionToken>,
    /// Rooms deleted because their last member expired
    pub deleted_rooms: Vec<RoomCode>,
    /// One snapshot per surviving room that lost members
    pub changed_rooms: Vec<RoomSnapshot>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// Resume the session for `token`, or create a new one.
    ///
    /// Never fails: an unknown or absent token yields a new player.
    async fn resolve_or_create(
        &self,
        token: Option<SessionToken>,
        connection: ConnectionHandle,
        now: Timestamp,
    ) -> Announcement;

    /// Read a player without touching its activity timestamp
    async fn lookup(&self, token: &SessionToken) -> Option<Player>;

    /// Record activity for a player
    async fn touch(&self, token: &SessionToken, now: Timestamp);

    /// Clear the player's connection if it is still `connection_id`.
    ///
    /// Returns the player's room snapshot when the handle was cleared and the
    /// player is in a room.
    async fn detach_connection(
        &self,
        token: &SessionToken,
        connection_id: ConnectionId,
        now: Timestamp,
    ) -> Option<RoomSnapshot>;

    async fn create_room(
        &self,
        token: &SessionToken,
        display_name: DisplayName,
        now: Timestamp,
    ) -> Result<RoomSnapshot, LobbyError>;

    async fn join_room(
        &self,
        code: &RoomCode,
        token: &SessionToken,
        display_name: DisplayName,
        now: Timestamp,
    ) -> Result<RoomSnapshot, LobbyError>;

    async fn leave_room(
        &self,
        token: &SessionToken,
        now: Timestamp,
    ) -> Result<LeaveOutcome, LobbyError>;

    async fn start_game(
        &self,
        token: &SessionToken,
        now: Timestamp,
    ) -> Result<RoomSnapshot, LobbyError>;

    /// Delete disconnected players whose last activity is older than `cutoff`
    async fn expire_inactive(&self, cutoff: Timestamp) -> Expiry;

    async fn room_snapshot(&self, code: &RoomCode) -> Option<RoomSnapshot>;

    /// Snapshots of every live room, ordered by code
    async fn list_rooms(&self) -> Vec<RoomSnapshot>;

    async fn count_sessions(&self) -> usize;
}
