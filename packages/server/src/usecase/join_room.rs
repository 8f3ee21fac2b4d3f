//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 参加順が保持され、ホストが変わらないことを保証
//! - 参加失敗時にレジストリが変更されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存ルームへの参加（ルームコードの大文字小文字を問わない）
//! - 異常系：存在しないルーム、二重参加

use std::sync::Arc;

use crate::domain::{
    DisplayName, LobbyError, LobbyRepository, RoomCode, RoomSnapshot, SessionToken, Timestamp,
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn LobbyRepository>,
}

impl JoinRoomUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// 既存ルームに参加する
    ///
    /// # Returns
    ///
    /// * `Ok(RoomSnapshot)` - 参加後のルーム
    /// * `Err(LobbyError::RoomNotFound | LobbyError::AlreadyInRoom)` - 参加失敗
    pub async fn execute(
        &self,
        code: &RoomCode,
        token: &SessionToken,
        display_name: DisplayName,
    ) -> Result<RoomSnapshot, LobbyError> {
        self.repository
            .join_room(code, token, display_name, Timestamp::now())
            .await
            .inspect_err(|e| tracing::debug!(room = %code, error = %e, "Join rejected"))
    }
}
