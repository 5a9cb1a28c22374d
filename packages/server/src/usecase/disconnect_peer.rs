//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPeerUseCase::execute() メソッド
//! - ConnectionSet からの削除と冪等性
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続の削除
//! - エッジケース：生存確認で既に削除された接続の切断（何もしない）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository};

/// 切断のユースケース
pub struct DisconnectPeerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
}

impl DisconnectPeerUseCase {
    /// 新しい DisconnectPeerUseCase を作成
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// `true` if the connection was removed, `false` if it was already gone
    pub async fn execute(&self, id: &ConnectionId) -> bool {
        self.repository.remove_connection(id).await
    }

    /// 残りの接続数を取得
    pub async fn count_remaining_connections(&self) -> usize {
        self.repository.count_connections().await
    }
}
