//! Repository trait for the Connection Set.
//!
//! UseCase 層はこの trait（ドメイン層）に依存し、具体的な実装には依存しません（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::{mpsc::UnboundedSender, oneshot};

use super::{
    entity::{Connection, LivenessSweep, OutboundMessage},
    error::RepositoryError,
    value_object::{ConnectionId, Timestamp},
};

/// Data access for open connections and their outbound channels
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Register a connection together with its outbound channel.
    ///
    /// `terminate` tears the socket down directly, bypassing the outbound queue.
    async fn add_connection(
        &self,
        id: ConnectionId,
        sender: UnboundedSender<OutboundMessage>,
        terminate: oneshot::Sender<()>,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// Remove a connection. Returns `false` if it was already gone.
    async fn remove_connection(&self, id: &ConnectionId) -> bool;

    /// Remove a connection and fire its terminate signal.
    /// Returns `false` if it was already gone.
    async fn terminate_connection(&self, id: &ConnectionId) -> bool;

    /// Record a pong from the peer. Returns `false` if the connection is unknown.
    async fn mark_alive(&self, id: &ConnectionId) -> bool;

    /// Apply one liveness sweep to the Connection Set
    async fn sweep_liveness(&self) -> LivenessSweep;

    /// Every open connection except `sender`
    async fn get_broadcast_targets(&self, sender: &ConnectionId) -> Vec<ConnectionId>;

    /// Queue a message on a connection's outbound channel
    async fn send_to(
        &self,
        id: &ConnectionId,
        message: OutboundMessage,
    ) -> Result<(), RepositoryError>;

    /// Snapshot of all open connections
    async fn get_connections(&self) -> Vec<Connection>;

    async fn count_connections(&self) -> usize;
}
