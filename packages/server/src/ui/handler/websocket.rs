//! WebSocket connection handler.
//!
//! Each socket gets a bounded outbox drained by a writer task, and a read loop
//! that feeds frames to its [`ConnectionSession`] one at a time.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionHandle,
    ui::{session::ConnectionSession, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let (tx, mut rx) = mpsc::channel::<String>(state.config.outbox_capacity);
    let connection = ConnectionHandle::new(tx);
    let connection_id = connection.id();
    tracing::debug!(connection = %connection_id, "WebSocket connected");

    // Spawn a task to drain the outbox into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(json) = rx.recv().await {
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut session = ConnectionSession::new(state.repository.clone(), connection);

    let recv_loop = async {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => session.handle_text(text.as_str()).await,
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(connection = %connection_id, "WebSocket error: {}", e);
                    break;
                }
            }
        }
    };

    // If either side finishes, the connection is over. Dropping recv_loop mid-request
    // is fine: registry operations never await after their first write.
    tokio::select! {
        _ = recv_loop => {},
        _ = &mut send_task => {},
    }

    session.close().await;
    send_task.abort();
    tracing::debug!(connection = %connection_id, "WebSocket disconnected");
}
