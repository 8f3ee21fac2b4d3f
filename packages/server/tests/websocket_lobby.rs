//! WebSocket lobby integration tests.
//!
//! Drives the full stack over real sockets: announce, room lifecycle, host
//! handover and reconnection.

mod fixtures;
use fixtures::{TestServer, WsClient};

#[tokio::test]
async fn test_create_join_leave_scenario() {
    // テスト項目: 作成・参加・退出の一連の流れでホストが引き継がれ、ルームが消える
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = WsClient::connect(&server.ws_url()).await;
    let mut bob = WsClient::connect(&server.ws_url()).await;
    alice.announce(None).await;
    bob.announce(None).await;

    // when (操作): A がルームを作る
    alice
        .send(serde_json::json!({"type": "createRoom", "displayName": "A"}))
        .await;

    // then (期待する結果):
    let joined = alice.recv_type("joinedRoom").await;
    assert_eq!(joined["roomOwner"], true);
    assert_eq!(joined["players"], serde_json::json!(["A"]));
    let code = joined["roomCode"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 4);
    assert!(code.chars().all(|c| c.is_ascii_uppercase()));
    alice.recv_type("roomState").await;

    // when (操作): B が参加する
    bob.send(serde_json::json!({"type": "joinRoom", "roomCode": code, "displayName": "B"}))
        .await;

    // then (期待する結果):
    let joined = bob.recv_type("joinedRoom").await;
    assert_eq!(joined["roomOwner"], false);
    assert_eq!(joined["players"], serde_json::json!(["A", "B"]));
    let state = alice.recv_type("roomState").await;
    assert_eq!(state["players"], serde_json::json!(["A", "B"]));
    assert_eq!(state["roomOwner"], true);
    bob.recv_type("roomState").await;

    // when (操作): A が退出する
    alice.send(serde_json::json!({"type": "leaveRoom"})).await;

    // then (期待する結果): B がホストになる
    let left = alice.recv_type("leftRoom").await;
    assert_eq!(left["roomCode"], code.as_str());
    let state = bob.recv_type("roomState").await;
    assert_eq!(state["players"], serde_json::json!(["B"]));
    assert_eq!(state["roomOwner"], true);

    // when (操作): B も退出する
    bob.send(serde_json::json!({"type": "leaveRoom"})).await;
    bob.recv_type("leftRoom").await;

    // then (期待する結果): ルームは削除されている
    let rooms: serde_json::Value = reqwest::get(format!("{}/api/rooms", server.base_url()))
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(rooms, serde_json::json!([]));
}

#[tokio::test]
async fn test_start_game_broadcasts_playing_state() {
    // テスト項目: 2 人そろえばゲームを開始でき、全員に playing が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = WsClient::connect(&server.ws_url()).await;
    let mut bob = WsClient::connect(&server.ws_url()).await;
    alice.announce(None).await;
    bob.announce(None).await;
    alice
        .send(serde_json::json!({"type": "createRoom", "displayName": "A"}))
        .await;
    let code = alice.recv_type("joinedRoom").await["roomCode"]
        .as_str()
        .unwrap()
        .to_string();
    alice.send(serde_json::json!({"type": "startGame"})).await;
    alice.recv_type("notEnoughPlayers").await;
    bob.send(serde_json::json!({"type": "joinRoom", "roomCode": code, "displayName": "B"}))
        .await;
    bob.recv_type("joinedRoom").await;

    // when (操作):
    bob.send(serde_json::json!({"type": "startGame"})).await;

    // then (期待する結果):
    let started = bob.recv_type("gameStarted").await;
    assert_eq!(started["state"], "playing");
    let mut seen = alice.recv_type("roomState").await;
    while seen["state"] != "playing" {
        seen = alice.recv_type("roomState").await;
    }
    assert_eq!(seen["players"], serde_json::json!(["A", "B"]));
}

#[tokio::test]
async fn test_reconnect_with_token_restores_membership() {
    // テスト項目: 切断するとオフライン表示になり、同じトークンで再接続すると復帰する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = WsClient::connect(&server.ws_url()).await;
    let mut bob = WsClient::connect(&server.ws_url()).await;
    let session = alice.announce(None).await;
    let token = session["sessionToken"].as_str().unwrap().to_string();
    bob.announce(None).await;
    alice
        .send(serde_json::json!({"type": "createRoom", "displayName": "A"}))
        .await;
    let code = alice.recv_type("joinedRoom").await["roomCode"]
        .as_str()
        .unwrap()
        .to_string();
    bob.send(serde_json::json!({"type": "joinRoom", "roomCode": code, "displayName": "B"}))
        .await;
    bob.recv_type("joinedRoom").await;
    bob.recv_type("roomState").await;

    // when (操作): A が切断する
    alice.close().await;

    // then (期待する結果): B には A がオフラインとして見える
    let state = bob.recv_type("roomState").await;
    assert_eq!(state["players"], serde_json::json!(["A", "B"]));
    assert_eq!(state["offline"], serde_json::json!(["A"]));

    // when (操作): A が同じトークンで再接続する
    let mut alice = WsClient::connect(&server.ws_url()).await;
    let session = alice.announce(Some(&token)).await;

    // then (期待する結果):
    assert_eq!(session["resumed"], true);
    assert_eq!(session["sessionToken"], token.as_str());
    assert_eq!(session["roomCode"], code.as_str());
    let state = alice.recv_type("roomState").await;
    assert_eq!(state["roomOwner"], true);
    assert_eq!(state["offline"], serde_json::json!([]));
    let state = bob.recv_type("roomState").await;
    assert_eq!(state["offline"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_token_gets_new_session() {
    // テスト項目: 未知のトークンでの announce は新しいセッションになる
    let server = TestServer::start().await;
    let mut client = WsClient::connect(&server.ws_url()).await;

    let session = client.announce(Some("deadbeef")).await;

    assert_eq!(session["resumed"], false);
    assert_ne!(session["sessionToken"], "deadbeef");
    assert!(session.get("roomCode").is_none());
}
