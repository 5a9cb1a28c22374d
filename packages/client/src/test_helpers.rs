//! Shared test helpers for client tests: an in-process transport.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    time::Instant,
};

use crate::transport::{Connector, Link, TransportError, TransportResult};

/// In-process transport.
///
/// Every connect attempt is recorded. An attempt succeeds only if a link was
/// queued with [`MemoryConnector::queue_link`]; otherwise it is refused.
#[derive(Default)]
pub struct MemoryConnector {
    pending: Mutex<VecDeque<MemoryLink>>,
    attempts: Mutex<Vec<Instant>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the next connect attempt succeed; the returned peer is the
    /// relay side of that link.
    pub fn queue_link(&self) -> MemoryPeer {
        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        self.pending
            .lock()
            .push_back(MemoryLink { inbound, outbound });
        MemoryPeer {
            to_client,
            from_client,
        }
    }

    /// When each connect attempt happened
    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().len()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, url: &str) -> TransportResult<Box<dyn Link>> {
        self.attempts.lock().push(Instant::now());
        match self.pending.lock().pop_front() {
            Some(link) => Ok(Box::new(link)),
            None => Err(TransportError::ConnectionFailed(format!(
                "{} refused the connection",
                url
            ))),
        }
    }
}

struct MemoryLink {
    inbound: UnboundedReceiver<String>,
    outbound: UnboundedSender<String>,
}

#[async_trait]
impl Link for MemoryLink {
    async fn send(&mut self, text: String) -> TransportResult<()> {
        self.outbound
            .send(text)
            .map_err(|_| TransportError::ConnectionClosed)
    }

    async fn recv(&mut self) -> TransportResult<Option<String>> {
        Ok(self.inbound.recv().await)
    }

    async fn close(&mut self) {
        self.inbound.close();
    }
}

/// Relay side of a [`MemoryConnector`] link. Dropping it closes the link.
pub struct MemoryPeer {
    to_client: UnboundedSender<String>,
    from_client: UnboundedReceiver<String>,
}

impl MemoryPeer {
    /// Deliver a raw frame to the client. Returns `false` if the link is
    /// already closed.
    pub fn push(&self, frame: impl Into<String>) -> bool {
        self.to_client.send(frame.into()).is_ok()
    }

    /// Next frame the client sent, `None` once the client dropped the link
    pub async fn next_sent(&mut self) -> Option<String> {
        self.from_client.recv().await
    }

    pub fn try_next_sent(&mut self) -> Option<String> {
        self.from_client.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_connector_refuses_without_queued_link() {
        // テスト項目: リンクが用意されていない接続試行は拒否され、記録される
        // given (前提条件):
        let connector = MemoryConnector::new();

        // when (操作):
        let result = connector.connect("ws://relay/ws").await;

        // then (期待する結果):
        assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
        assert_eq!(connector.attempt_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_link_carries_frames_both_ways() {
        // テスト項目: 用意されたリンクで双方向にフレームが届く
        // given (前提条件):
        let connector = MemoryConnector::new();
        let mut peer = connector.queue_link();
        let mut link = connector.connect("ws://relay/ws").await.unwrap();

        // when (操作):
        link.send("from client".to_string()).await.unwrap();
        assert!(peer.push("from relay"));

        // then (期待する結果):
        assert_eq!(peer.next_sent().await.as_deref(), Some("from client"));
        assert_eq!(link.recv().await.unwrap().as_deref(), Some("from relay"));
    }

    #[tokio::test]
    async fn test_dropping_peer_closes_link() {
        // テスト項目: MemoryPeer を破棄するとクライアント側の recv が None を返す
        // given (前提条件):
        let connector = MemoryConnector::new();
        let peer = connector.queue_link();
        let mut link = connector.connect("ws://relay/ws").await.unwrap();

        // when (操作):
        drop(peer);

        // then (期待する結果):
        assert_eq!(link.recv().await.unwrap(), None);
        assert_eq!(
            link.send("late".to_string()).await,
            Err(TransportError::ConnectionClosed)
        );
    }
}
