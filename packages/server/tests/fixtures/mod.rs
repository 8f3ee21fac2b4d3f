//! Shared helpers for integration tests.
//!
//! Each test starts its own server on an ephemeral port inside the test's
//! runtime, so tests can run in parallel without port clashes.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use lobby_server::{
    ServerConfig, domain::LobbyRepository, infrastructure::repository::InMemoryLobbyRepository,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), lobby_server::ServerError>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let config = ServerConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            ..ServerConfig::default()
        };
        let repository: Arc<dyn LobbyRepository> =
            Arc::new(InMemoryLobbyRepository::with_os_rng());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(lobby_server::serve(listener, config, repository, async {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.abort();
    }
}

/// A JSON-speaking WebSocket client
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url)
            .await
            .expect("Failed to connect WebSocket");
        Self { stream }
    }

    pub async fn send(&mut self, value: serde_json::Value) {
        self.stream
            .send(Message::Text(value.to_string().into()))
            .await
            .expect("Failed to send message");
    }

    /// Next JSON message, failing the test after two seconds of silence
    pub async fn recv(&mut self) -> serde_json::Value {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(2), self.stream.next())
                .await
                .expect("Timed out waiting for a message")
                .expect("Connection closed")
                .expect("WebSocket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).expect("Invalid JSON from server");
            }
        }
    }

    /// Skip messages until one of type `kind` arrives
    pub async fn recv_type(&mut self, kind: &str) -> serde_json::Value {
        loop {
            let message = self.recv().await;
            if message["type"] == kind {
                return message;
            }
        }
    }

    /// Announce and return the session token
    pub async fn announce(&mut self, token: Option<&str>) -> serde_json::Value {
        let mut request = serde_json::json!({"type": "announce"});
        if let Some(token) = token {
            request["sessionToken"] = serde_json::Value::from(token);
        }
        self.send(request).await;
        self.recv_type("session").await
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
