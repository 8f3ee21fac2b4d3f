//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// SessionToken validation error
    #[error("SessionToken cannot be empty")]
    SessionTokenEmpty,

    /// SessionToken too long error
    #[error("SessionToken cannot exceed {max} characters (got {actual})")]
    SessionTokenTooLong { max: usize, actual: usize },

    /// RoomCode validation error
    #[error("RoomCode cannot be empty")]
    RoomCodeEmpty,

    /// RoomCode invalid format error (not four letters)
    #[error("RoomCode must be four letters A-Z (got {length} characters)")]
    RoomCodeInvalidFormat { length: usize },

    /// DisplayName validation error
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// DisplayName too long error
    #[error("DisplayName cannot exceed {max} characters (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// Not enough members to start a game
    #[error("At least {required} players are needed to start (current: {current})")]
    NotEnoughPlayers { required: usize, current: usize },
}

/// Failures of registry operations.
///
/// Every variant is recovered by the connection that issued the request and
/// turned into a response for that connection only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LobbyError {
    #[error("No such session")]
    NoSuchSession,

    #[error("Room not found")]
    RoomNotFound,

    #[error("Already in a room")]
    AlreadyInRoom,

    #[error("Not in a room")]
    NotInRoom,

    #[error("Not enough players to start the game")]
    NotEnoughPlayers,

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl From<ValueObjectError> for LobbyError {
    fn from(e: ValueObjectError) -> Self {
        Self::MalformedRequest(e.to_string())
    }
}

impl From<RoomError> for LobbyError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::NotEnoughPlayers { .. } => Self::NotEnoughPlayers,
        }
    }
}

/// Failure to push a payload into a connection's outbox.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Outbox full")]
    Full,

    #[error("Connection closed")]
    Closed,
}
