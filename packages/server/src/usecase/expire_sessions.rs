//! UseCase: 非アクティブセッションの期限切れ処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ExpireSessionsUseCase::execute_at() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断されたまま放置されたプレイヤーがルームから取り除かれることを保証
//! - 接続中のプレイヤーは期限切れにならないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：期限切れプレイヤーの削除とホスト引き継ぎ
//! - エッジケース：最後のメンバーが期限切れになりルームが消える

use std::{sync::Arc, time::Duration};

use lobby_shared::time::cutoff_millis;

use crate::domain::{Expiry, LobbyRepository, Timestamp};

/// 期限切れ処理のユースケース
pub struct ExpireSessionsUseCase {
    repository: Arc<dyn LobbyRepository>,
    /// 最終活動からこの時間が経過した切断中プレイヤーを削除する
    timeout: Duration,
}

impl ExpireSessionsUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    /// 現在時刻を基準に期限切れ処理を実行
    pub async fn execute(&self) -> Expiry {
        let now = Timestamp::now();
        self.execute_at(Timestamp::new(cutoff_millis(now.value(), self.timeout)))
            .await
    }

    /// `cutoff` より前に最終活動した切断中プレイヤーを削除
    pub async fn execute_at(&self, cutoff: Timestamp) -> Expiry {
        let expiry = self.repository.expire_inactive(cutoff).await;
        if !expiry.expired.is_empty() {
            tracing::info!(
                expired = expiry.expired.len(),
                deleted_rooms = expiry.deleted_rooms.len(),
                changed_rooms = expiry.changed_rooms.len(),
                "Expired inactive sessions"
            );
        }
        expiry
    }
}
