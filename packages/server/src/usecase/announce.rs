//! UseCase: セッション宣言処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AnnounceUseCase::execute() / refresh() メソッド
//! - トークンの解決（新規発行・再開）と接続の付け替え
//!
//! ### なぜこのテストが必要か
//! - 再接続したプレイヤーが同じセッションとルームに戻れることを保証
//! - 不正なトークンが新規セッションとして扱われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：トークンなしの新規接続、既知トークンでの再開
//! - 異常系：形式不正・未知のトークン
//! - エッジケース：ルーム所属中のプレイヤーの再開

use std::sync::Arc;

use crate::domain::{
    Announcement, ConnectionHandle, LobbyRepository, SessionToken, Timestamp,
};

/// セッション宣言のユースケース
pub struct AnnounceUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl AnnounceUseCase {
    /// 新しい AnnounceUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// セッションを解決し、接続を登録する
    ///
    /// # Arguments
    ///
    /// * `raw_token` - クライアントが提示したトークン（空文字列は「なし」）
    /// * `connection` - この接続の outbox
    ///
    /// # Returns
    ///
    /// 解決されたプレイヤーと、再開時に所属していたルームのスナップショット
    pub async fn execute(&self, raw_token: &str, connection: ConnectionHandle) -> Announcement {
        // 1. トークンを Domain Model に変換（不正な値は新規扱い）
        let token = if raw_token.is_empty() {
            None
        } else {
            match SessionToken::new(raw_token.to_string()) {
                Ok(token) => Some(token),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring malformed session token");
                    None
                }
            }
        };

        // 2. Repository でセッションを解決
        self.repository
            .resolve_or_create(token, connection, Timestamp::now())
            .await
    }

    /// 既に宣言済みの接続からの再宣言：活動時刻だけを更新する
    pub async fn refresh(&self, token: &SessionToken) {
        self.repository.touch(token, Timestamp::now()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MockLobbyRepository, Player},
        usecase::test_support::create_test_repository,
    };
    use tokio::sync::mpsc;

    fn handle() -> (ConnectionHandle, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (ConnectionHandle::new(tx), rx)
    }

    #[tokio::test]
    async fn test_announce_without_token_creates_session() {
        // テスト項目: トークンなしで宣言すると新しいセッションが発行される
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = AnnounceUseCase::new(repository.clone());
        let (connection, _rx) = handle();

        // when (操作):
        let announcement = usecase.execute("", connection).await;

        // then (期待する結果):
        assert!(!announcement.resumed);
        assert!(announcement.room.is_none());
        assert!(!announcement.player.token.as_str().is_empty());
        assert_eq!(repository.count_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_announce_with_known_token_resumes_room() {
        // テスト項目: 既知のトークンで再宣言するとルーム所属ごと再開される
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = AnnounceUseCase::new(repository.clone());
        let (first, _rx1) = handle();
        let token = usecase.execute("", first).await.player.token;
        repository
            .create_room(
                &token,
                DisplayName::new("Alice".to_string()).unwrap(),
                Timestamp::now(),
            )
            .await
            .unwrap();

        // when (操作):
        let (second, _rx2) = handle();
        let announcement = usecase.execute(token.as_str(), second).await;

        // then (期待する結果):
        assert!(announcement.resumed);
        assert_eq!(announcement.player.token, token);
        let room = announcement.room.expect("resumed player should be in a room");
        assert_eq!(room.player_names(), vec!["Alice".to_string()]);
        assert!(room.is_host(&token));
    }

    #[tokio::test]
    async fn test_announce_with_malformed_token_is_treated_as_new() {
        // テスト項目: 長すぎるトークンは新規セッションとして扱われる
        // given (前提条件):
        let mut mock = MockLobbyRepository::new();
        mock.expect_resolve_or_create()
            .withf(|token, _, _| token.is_none())
            .times(1)
            .returning(|_, connection, now| Announcement {
                player: Player::new(
                    SessionToken::new("fresh".to_string()).unwrap(),
                    connection,
                    now,
                ),
                resumed: false,
                room: None,
            });
        let usecase = AnnounceUseCase::new(Arc::new(mock));
        let (connection, _rx) = handle();

        // when (操作):
        let announcement = usecase.execute(&"x".repeat(200), connection).await;

        // then (期待する結果):
        assert_eq!(announcement.player.token.as_str(), "fresh");
    }

    #[tokio::test]
    async fn test_refresh_touches_session() {
        // テスト項目: 再宣言は活動時刻の更新だけを行う
        let mut mock = MockLobbyRepository::new();
        mock.expect_touch()
            .withf(|token, _| token.as_str() == "abc")
            .times(1)
            .returning(|_, _| ());
        let usecase = AnnounceUseCase::new(Arc::new(mock));

        usecase
            .refresh(&SessionToken::new("abc".to_string()).unwrap())
            .await;
    }
}
