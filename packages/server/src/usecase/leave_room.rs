//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - ホスト退出時のホスト引き継ぎ、最後の一人の退出によるルーム削除
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの退出、ホストの退出
//! - エッジケース：ルーム未所属での退出（何もしない）

use std::sync::Arc;

use crate::domain::{LeaveOutcome, LobbyError, LobbyRepository, SessionToken, Timestamp};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn LobbyRepository>,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// 現在のルームから退出する
    ///
    /// 残ったメンバーがいる場合は `LeaveOutcome::Left` の `remaining` に
    /// ブロードキャスト用のスナップショットが入る。
    pub async fn execute(&self, token: &SessionToken) -> Result<LeaveOutcome, LobbyError> {
        let outcome = self.repository.leave_room(token, Timestamp::now()).await?;
        if matches!(outcome, LeaveOutcome::AlreadyLeft) {
            tracing::debug!("Leave requested outside of a room");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MockLobbyRepository},
        usecase::{
            CreateRoomUseCase, JoinRoomUseCase,
            test_support::{announce, create_test_repository},
        },
    };

    fn name(value: &str) -> DisplayName {
        DisplayName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_host_leaving_promotes_next_member() {
        // テスト項目: ホストが抜けると次に古いメンバーがホストになる
        // given (前提条件):
        let repository = create_test_repository();
        let (alice, _rx_a) = announce(&repository).await;
        let (bob, _rx_b) = announce(&repository).await;
        let created = CreateRoomUseCase::new(repository.clone())
            .execute(&alice.token, name("Alice"))
            .await
            .unwrap();
        JoinRoomUseCase::new(repository.clone())
            .execute(&created.code, &bob.token, name("Bob"))
            .await
            .unwrap();
        let usecase = LeaveRoomUseCase::new(repository.clone());

        // when (操作):
        let outcome = usecase.execute(&alice.token).await.unwrap();

        // then (期待する結果):
        let LeaveOutcome::Left {
            code,
            remaining: Some(snapshot),
        } = outcome
        else {
            panic!("expected the room to survive");
        };
        assert_eq!(code, created.code);
        assert_eq!(snapshot.player_names(), vec!["Bob".to_string()]);
        assert!(snapshot.is_host(&bob.token));
    }

    #[tokio::test]
    async fn test_last_member_leaving_deletes_room() {
        // テスト項目: 最後の一人が抜けるとルームが削除される
        let repository = create_test_repository();
        let (alice, _rx) = announce(&repository).await;
        let created = CreateRoomUseCase::new(repository.clone())
            .execute(&alice.token, name("Alice"))
            .await
            .unwrap();

        let outcome = LeaveRoomUseCase::new(repository.clone())
            .execute(&alice.token)
            .await
            .unwrap();

        assert!(matches!(outcome, LeaveOutcome::Left { remaining: None, .. }));
        assert!(repository.room_snapshot(&created.code).await.is_none());
    }

    #[tokio::test]
    async fn test_leave_without_room_is_noop() {
        // テスト項目: ルーム未所属なら AlreadyLeft が返る
        let mut mock = MockLobbyRepository::new();
        mock.expect_leave_room()
            .times(1)
            .returning(|_, _| Ok(LeaveOutcome::AlreadyLeft));
        let usecase = LeaveRoomUseCase::new(Arc::new(mock));

        let outcome = usecase
            .execute(&SessionToken::new("t".to_string()).unwrap())
            .await
            .unwrap();

        assert!(matches!(outcome, LeaveOutcome::AlreadyLeft));
    }
}
