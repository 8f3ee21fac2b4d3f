//! Server startup and routing.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
    sweeper::spawn_session_sweeper,
};
use crate::{
    config::ServerConfig, domain::LobbyRepository, error::ServerError,
    infrastructure::repository::InMemoryLobbyRepository,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{code}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    tracing::info!("Lobby server listening on {}", address);

    let repository: Arc<dyn LobbyRepository> = Arc::new(InMemoryLobbyRepository::with_os_rng());
    serve(listener, config, repository, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// The idle session sweeper runs for as long as the server does.
pub async fn serve<F>(
    listener: TcpListener,
    config: ServerConfig,
    repository: Arc<dyn LobbyRepository>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;
    let config = Arc::new(config);

    let sweeper = spawn_session_sweeper(
        repository.clone(),
        config.sweep_interval(),
        config.session_timeout(),
    );

    let state = Arc::new(AppState { repository, config });
    let app = build_router(state);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    sweeper.abort();
    tracing::info!("Lobby server stopped");
    result.map_err(ServerError::from)
}
