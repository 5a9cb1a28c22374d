//! UseCase: 生存確認処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LivenessUseCase::sweep() と record_pong()
//! - 前回のプローブに応答しなかった接続の強制終了と削除
//! - 応答した接続へのプローブ送信
//!
//! ### なぜこのテストが必要か
//! - 半開き接続が ConnectionSet に残り続けないことを保証（最大 2 スイープ間隔）
//!
//! ### どのような状況を想定しているか
//! - 正常系：pong を返す接続は残り続ける
//! - 異常系：pong を返さない接続は 2 回目のスイープで終了される
//! - エッジケース：送信チャンネルが閉じている接続へのプローブ

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, LivenessSweep, OutboundMessage};

/// 生存確認のユースケース
pub struct LivenessUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
}

impl LivenessUseCase {
    /// 新しい LivenessUseCase を作成
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// Run one sweep over the Connection Set.
    ///
    /// Connections that never answered the previous probe are removed and
    /// their sockets torn down, whatever is still queued for them. Every other
    /// connection gets a fresh probe; a connection whose outbound channel is
    /// already closed is terminated as well.
    pub async fn sweep(&self) -> LivenessSweep {
        let mut outcome = self.repository.sweep_liveness().await;

        for id in &outcome.terminate {
            tracing::info!("Terminating unresponsive connection '{}'", id);
            self.repository.terminate_connection(id).await;
        }

        let mut closed = Vec::new();
        for id in &outcome.probe {
            if let Err(e) = self.repository.send_to(id, OutboundMessage::Ping).await {
                tracing::debug!("Failed to probe '{}': {}", id, e);
                self.repository.terminate_connection(id).await;
                closed.push(id.clone());
            }
        }
        outcome.probe.retain(|id| !closed.contains(id));
        outcome.terminate.extend(closed);

        tracing::debug!(
            "Liveness sweep: {} probed, {} terminated",
            outcome.probe.len(),
            outcome.terminate.len()
        );
        outcome
    }

    /// Record a pong from the peer. Returns `false` for unknown connections.
    pub async fn record_pong(&self, id: &ConnectionId) -> bool {
        self.repository.mark_alive(id).await
    }
}
