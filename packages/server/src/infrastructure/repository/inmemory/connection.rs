//! InMemory Connection Repository 実装
//!
//! ドメイン層が定義する ConnectionRepository trait の具体的な実装。
//! ConnectionSet ドメインモデルと、接続ごとの送信チャンネルを保持する HashMap を
//! インメモリ DB として使用します。
//!
//! Lock order is always `connection_set` then `connected_clients`.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender, oneshot};

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, ConnectionSet, LivenessSweep,
    OutboundMessage, RepositoryError, Timestamp,
};

/// Client connection information
#[derive(Debug)]
pub struct ClientInfo {
    /// Outbound channel drained by the socket's send task
    pub sender: UnboundedSender<OutboundMessage>,
    /// Closes the socket even while its send task is blocked on a write
    pub terminate: oneshot::Sender<()>,
    /// Unix timestamp when connected (in JST, milliseconds)
    pub connected_at: Timestamp,
}

/// インメモリ Connection Repository 実装
pub struct InMemoryConnectionRepository {
    /// ConnectionSet ドメインモデル
    connection_set: Arc<Mutex<ConnectionSet>>,
    /// 接続中のクライアント情報（WebSocket sender を含む）
    connected_clients: Arc<Mutex<HashMap<ConnectionId, ClientInfo>>>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self {
            connection_set: Arc::new(Mutex::new(ConnectionSet::new())),
            connected_clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryConnectionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn add_connection(
        &self,
        id: ConnectionId,
        sender: UnboundedSender<OutboundMessage>,
        terminate: oneshot::Sender<()>,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut set = self.connection_set.lock().await;
        set.add(Connection::new(id.clone(), connected_at))?;

        // Only if the set accepted the connection, register its sender
        let mut clients = self.connected_clients.lock().await;
        clients.insert(
            id,
            ClientInfo {
                sender,
                terminate,
                connected_at,
            },
        );
        Ok(())
    }

    async fn remove_connection(&self, id: &ConnectionId) -> bool {
        let mut set = self.connection_set.lock().await;
        let removed = set.remove(id).is_some();
        let mut clients = self.connected_clients.lock().await;
        clients.remove(id);
        removed
    }

    async fn terminate_connection(&self, id: &ConnectionId) -> bool {
        let mut set = self.connection_set.lock().await;
        let removed = set.remove(id).is_some();
        let mut clients = self.connected_clients.lock().await;
        if let Some(client) = clients.remove(id) {
            // The socket task may already be gone
            let _ = client.terminate.send(());
        }
        removed
    }

    async fn mark_alive(&self, id: &ConnectionId) -> bool {
        let mut set = self.connection_set.lock().await;
        set.mark_alive(id)
    }

    async fn sweep_liveness(&self) -> LivenessSweep {
        let mut set = self.connection_set.lock().await;
        set.sweep()
    }

    async fn get_broadcast_targets(&self, sender: &ConnectionId) -> Vec<ConnectionId> {
        let set = self.connection_set.lock().await;
        set.broadcast_targets(sender)
    }

    async fn send_to(
        &self,
        id: &ConnectionId,
        message: OutboundMessage,
    ) -> Result<(), RepositoryError> {
        let clients = self.connected_clients.lock().await;
        let client = clients
            .get(id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))?;
        client
            .sender
            .send(message)
            .map_err(|_| RepositoryError::ConnectionClosed(id.to_string()))
    }

    async fn get_connections(&self) -> Vec<Connection> {
        let set = self.connection_set.lock().await;
        set.connections().to_vec()
    }

    async fn count_connections(&self) -> usize {
        let set = self.connection_set.lock().await;
        set.len()
    }
}
