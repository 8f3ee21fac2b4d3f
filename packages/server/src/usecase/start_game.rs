//! UseCase: ゲーム開始処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - StartGameUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人以上のルームで開始
//! - 異常系：1 人だけのルーム、ルーム未所属

use std::sync::Arc;

use crate::domain::{LobbyError, LobbyRepository, RoomSnapshot, SessionToken, Timestamp};

/// ゲーム開始のユースケース
pub struct StartGameUseCase {
    repository: Arc<dyn LobbyRepository>,
}

impl StartGameUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// 呼び出し元のルームを playing 状態に遷移させる
    pub async fn execute(&self, token: &SessionToken) -> Result<RoomSnapshot, LobbyError> {
        self.repository
            .start_game(token, Timestamp::now())
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "Start rejected"))
    }
}
