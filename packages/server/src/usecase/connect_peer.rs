//! UseCase: 接続受付処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectPeerUseCase::execute() メソッド
//! - 接続 ID の採番と ConnectionSet への登録
//!
//! ### なぜこのテストが必要か
//! - 受付直後からブロードキャスト対象になることを保証
//! - 新しい接続の生存フラグが true であることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の受付
//! - 異常系：Repository が登録を拒否した場合

use std::sync::Arc;

use pilgrim_sync_shared::time::get_jst_timestamp;
use tokio::sync::{mpsc::UnboundedSender, oneshot};

use crate::domain::{
    ConnectionId, ConnectionIdFactory, ConnectionRepository, OutboundMessage, Timestamp,
};

use super::error::ConnectError;

/// 接続受付のユースケース
pub struct ConnectPeerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
}

impl ConnectPeerUseCase {
    /// 新しい ConnectPeerUseCase を作成
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// 接続受付を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - この接続への送信チャンネル
    /// * `terminate` - 送信キューを経由せずにソケットを閉じるためのシグナル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 採番された接続 ID
    /// * `Err(ConnectError)` - 受付失敗
    pub async fn execute(
        &self,
        sender: UnboundedSender<OutboundMessage>,
        terminate: oneshot::Sender<()>,
    ) -> Result<ConnectionId, ConnectError> {
        let id = ConnectionIdFactory::generate()
            .map_err(|e| ConnectError::IdGeneration(e.to_string()))?;
        let connected_at = Timestamp::new(get_jst_timestamp());

        self.repository
            .add_connection(id.clone(), sender, terminate, connected_at)
            .await?;

        Ok(id)
    }
}
