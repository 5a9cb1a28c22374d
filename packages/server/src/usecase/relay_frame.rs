//! UseCase: フレーム中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayFrameUseCase::execute() メソッド
//! - フレームの検証と、送信者以外の全接続へのそのままの転送
//!
//! ### なぜこのテストが必要か
//! - 送信者にフレームが戻らないことを保証（ファンアウトの正しさ）
//! - 不正なフレームが他の接続に影響しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数接続へのブロードキャスト
//! - 異常系：JSON でないフレーム、未知のチャンネル
//! - エッジケース：送信者のみが接続している場合、閉じた接続が混在する場合

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ConnectionRepository, OutboundMessage},
    infrastructure::dto::websocket::{Channel, parse_envelope},
};

use super::error::RelayError;

/// Result of relaying one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub channel: Channel,
    /// Peers the frame was queued for
    pub delivered: usize,
    /// Peers whose outbound channel was already closed
    pub skipped: usize,
}

/// フレーム中継のユースケース
pub struct RelayFrameUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
}

impl RelayFrameUseCase {
    /// 新しい RelayFrameUseCase を作成
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// フレーム中継を実行
    ///
    /// `raw` is validated as a Message Frame and then forwarded byte-for-byte
    /// to every other open connection. The payload is never decoded.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::MalformedFrame` if `raw` is not a valid frame.
    /// Nothing is forwarded in that case.
    pub async fn execute(
        &self,
        from: &ConnectionId,
        raw: &str,
    ) -> Result<RelayOutcome, RelayError> {
        let channel = parse_envelope(raw).map_err(|e| RelayError::MalformedFrame(e.to_string()))?;

        let targets = self.repository.get_broadcast_targets(from).await;
        let mut outcome = RelayOutcome {
            channel,
            delivered: 0,
            skipped: 0,
        };

        for target in targets {
            match self
                .repository
                .send_to(&target, OutboundMessage::Text(raw.to_string()))
                .await
            {
                Ok(()) => outcome.delivered += 1,
                Err(e) => {
                    // Closed between the membership check and the send
                    tracing::debug!("Skipping '{}': {}", target, e);
                    outcome.skipped += 1;
                }
            }
        }

        Ok(outcome)
    }
}
