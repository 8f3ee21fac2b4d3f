//! Shared utilities for the lobby server.
//!
//! Logging setup and the wall-clock helpers every layer stamps activity with.

pub mod logger;
pub mod time;
