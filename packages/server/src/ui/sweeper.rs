//! Idle session sweeper.
//!
//! A background task that periodically deletes players who have been
//! disconnected for longer than the session timeout, then pushes the new room
//! state to whoever is left in their rooms.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{
    domain::LobbyRepository,
    usecase::{ExpireSessionsUseCase, broadcast_room_state},
};

pub fn spawn_session_sweeper(
    repository: Arc<dyn LobbyRepository>,
    interval: Duration,
    timeout: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let usecase = ExpireSessionsUseCase::new(repository, timeout);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        tracing::info!(
            interval_secs = interval.as_secs(),
            timeout_secs = timeout.as_secs(),
            "Session sweeper started"
        );

        loop {
            ticker.tick().await;
            let expiry = usecase.execute().await;
            if expiry.expired.is_empty() {
                tracing::debug!("Sweep found no idle sessions");
                continue;
            }
            for snapshot in &expiry.changed_rooms {
                broadcast_room_state(snapshot);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, Timestamp},
        usecase::test_support::{announce, create_test_repository, drain},
    };

    // Paused clock: sleeps below auto-advance tokio time, so the sweeper ticks
    // without real waiting. Activity is stamped at the epoch so the wall-clock
    // cutoff is always past it.
    const TIMEOUT: Duration = Duration::from_secs(1);
    const INTERVAL: Duration = Duration::from_secs(10);

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_expires_disconnected_player_and_broadcasts() {
        // テスト項目: 切断中のプレイヤーが削除され、残ったメンバーに通知される
        // given (前提条件):
        let repository = create_test_repository();
        let (alice, _rx_a) = announce(&repository).await;
        let (bob, mut rx_b) = announce(&repository).await;
        let room = repository
            .create_room(
                &alice.token,
                DisplayName::new("Alice".to_string()).unwrap(),
                Timestamp::now(),
            )
            .await
            .unwrap();
        repository
            .join_room(
                &room.code,
                &bob.token,
                DisplayName::new("Bob".to_string()).unwrap(),
                Timestamp::now(),
            )
            .await
            .unwrap();
        repository
            .detach_connection(
                &alice.token,
                alice.connection.as_ref().unwrap().id(),
                Timestamp::new(0),
            )
            .await;

        // when (操作):
        let handle = spawn_session_sweeper(repository.clone(), INTERVAL, TIMEOUT);
        tokio::time::sleep(INTERVAL + INTERVAL / 2).await;
        handle.abort();

        // then (期待する結果):
        assert!(repository.lookup(&alice.token).await.is_none());
        assert!(repository.lookup(&bob.token).await.is_some());
        let to_bob = drain(&mut rx_b);
        let last = to_bob.last().expect("bob should get the new room state");
        assert_eq!(last["players"], serde_json::json!(["Bob"]));
        assert_eq!(last["roomOwner"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_waits_for_the_first_interval() {
        // テスト項目: 起動直後には掃除せず、最初の間隔が経過してから削除する
        // given (前提条件):
        let repository = create_test_repository();
        let (alice, _rx) = announce(&repository).await;
        repository
            .detach_connection(
                &alice.token,
                alice.connection.as_ref().unwrap().id(),
                Timestamp::new(0),
            )
            .await;
        let handle = spawn_session_sweeper(repository.clone(), INTERVAL, TIMEOUT);

        // when (操作):
        tokio::time::sleep(INTERVAL / 2).await;
        let before_first_tick = repository.lookup(&alice.token).await.is_some();
        tokio::time::sleep(INTERVAL).await;
        handle.abort();

        // then (期待する結果):
        assert!(before_first_tick);
        assert!(repository.lookup(&alice.token).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_keeps_connected_players() {
        // テスト項目: 接続中のプレイヤーはタイムアウトに関係なく残る
        let repository = create_test_repository();
        let (alice, _rx) = announce(&repository).await;

        let handle = spawn_session_sweeper(repository.clone(), INTERVAL, Duration::ZERO);
        tokio::time::sleep(INTERVAL * 3).await;
        handle.abort();

        assert!(repository.lookup(&alice.token).await.is_some());
    }
}
