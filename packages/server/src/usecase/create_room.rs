//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルームを作成し、作成者がホストになる
//! - 異常系：既に別のルームに所属している

use std::sync::Arc;

use crate::domain::{
    DisplayName, LobbyError, LobbyRepository, RoomSnapshot, SessionToken, Timestamp,
};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn LobbyRepository>,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// 新しいルームを作成し、呼び出し元をホストとして参加させる
    ///
    /// # Returns
    ///
    /// * `Ok(RoomSnapshot)` - 作成直後のルーム（ブロードキャスト用）
    /// * `Err(LobbyError)` - セッション不明、または既にルームに所属
    pub async fn execute(
        &self,
        token: &SessionToken,
        display_name: DisplayName,
    ) -> Result<RoomSnapshot, LobbyError> {
        self.repository
            .create_room(token, display_name, Timestamp::now())
            .await
    }
}
