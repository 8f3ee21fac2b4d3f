//! WebSocket lobby server implementation.

mod handler;
mod runner;
mod session;
mod signal;
pub mod state;
mod sweeper;

pub use runner::{build_router, run, serve};
pub use session::ConnectionSession;
