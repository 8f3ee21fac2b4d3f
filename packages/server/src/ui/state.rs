//! Shared application state.

use std::sync::Arc;

use crate::{config::ServerConfig, domain::LobbyRepository};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn LobbyRepository>,
    pub config: Arc<ServerConfig>,
}
