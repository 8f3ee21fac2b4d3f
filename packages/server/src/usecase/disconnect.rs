//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 切断時にセッションとルーム所属が保持されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム所属中のプレイヤーの切断
//! - エッジケース：既に新しい接続に置き換わった古い接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, LobbyRepository, RoomSnapshot, SessionToken, Timestamp};

/// 切断のユースケース
pub struct DisconnectUseCase {
    repository: Arc<dyn LobbyRepository>,
}

impl DisconnectUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// 接続ハンドルを外す。セッションとルーム所属はそのまま残る
    ///
    /// # Returns
    ///
    /// 所属ルームのスナップショット（オフライン表示のブロードキャスト用）。
    /// 接続が既に置き換わっている場合やルーム未所属の場合は `None`
    pub async fn execute(
        &self,
        token: &SessionToken,
        connection_id: ConnectionId,
    ) -> Option<RoomSnapshot> {
        let snapshot = self
            .repository
            .detach_connection(token, connection_id, Timestamp::now())
            .await;
        tracing::debug!(
            room = ?snapshot.as_ref().map(|s| s.code.as_str().to_string()),
            "Connection detached"
        );
        snapshot
    }
}
