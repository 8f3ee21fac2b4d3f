//! Domain layer for the lobby.
//!
//! This module contains the session and room model and the registry contract,
//! independent of wire DTOs and infrastructure concerns.

pub mod connection;
pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod snapshot;
pub mod value_object;

pub use connection::ConnectionHandle;
pub use entity::{Departure, Player, Room, RoomState};
pub use error::{DeliveryError, LobbyError, RoomError, ValueObjectError};
pub use factory::{IdGenerator, RandomIdGenerator};
pub use repository::{Announcement, Expiry, LeaveOutcome, LobbyRepository};
#[cfg(test)]
pub use repository::MockLobbyRepository;
pub use snapshot::{MemberSnapshot, RoomSnapshot};
pub use value_object::{ConnectionId, DisplayName, RoomCode, SessionToken, Timestamp};
