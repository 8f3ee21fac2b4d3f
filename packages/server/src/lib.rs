//! Multiplayer lobby server library.
//!
//! Players open a WebSocket, announce themselves to get (or resume) a session
//! token, and then create, join, leave and start rooms identified by short
//! codes. Every room change is pushed to the room's connected members.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{run, serve};
