//! Core domain models for the sync relay.

use super::{
    error::ConnectionSetError,
    value_object::{ConnectionId, Timestamp},
};

/// Message queued for delivery to one peer's socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Relayed Message Frame, forwarded verbatim
    Text(String),
    /// Liveness probe (WebSocket ping)
    Ping,
}

/// Represents one peer connection to the relay
#[derive(Debug, Clone)]
pub struct Connection {
    /// Connection identifier
    pub id: ConnectionId,
    /// Timestamp when the peer connected
    pub connected_at: Timestamp,
    /// Whether the peer answered the last liveness probe
    pub alive: bool,
}

impl Connection {
    /// Create a new connection. A fresh connection counts as alive.
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            alive: true,
        }
    }
}

/// Outcome of one liveness sweep over the Connection Set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LivenessSweep {
    /// Connections that missed the previous probe and must be terminated
    pub terminate: Vec<ConnectionId>,
    /// Connections that were alive; their flag is now cleared and a probe is due
    pub probe: Vec<ConnectionId>,
}

/// All connections currently open on the relay
#[derive(Debug, Clone, Default)]
pub struct ConnectionSet {
    connections: Vec<Connection>,
}

impl ConnectionSet {
    /// Create an empty connection set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection
    ///
    /// # Errors
    ///
    /// Returns `ConnectionSetError::DuplicateConnection` if the id is already a member
    pub fn add(&mut self, connection: Connection) -> Result<(), ConnectionSetError> {
        if self.contains(&connection.id) {
            return Err(ConnectionSetError::DuplicateConnection(
                connection.id.into_string(),
            ));
        }
        self.connections.push(connection);
        Ok(())
    }

    /// Remove a connection by id. Removing a non-member is a no-op returning `None`.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| &c.id == id)?;
        Some(self.connections.remove(index))
    }

    /// Record a pong. Returns `false` if the connection is not a member.
    pub fn mark_alive(&mut self, id: &ConnectionId) -> bool {
        match self.connections.iter_mut().find(|c| &c.id == id) {
            Some(connection) => {
                connection.alive = true;
                true
            }
            None => false,
        }
    }

    /// Every member except `sender`
    pub fn broadcast_targets(&self, sender: &ConnectionId) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .filter(|c| &c.id != sender)
            .map(|c| c.id.clone())
            .collect()
    }

    /// Apply one liveness sweep.
    ///
    /// Connections whose flag is still false since the previous sweep are
    /// reported for termination (membership is left to the caller, which
    /// removes them after closing the socket). All other connections get their
    /// flag cleared and are reported for probing.
    pub fn sweep(&mut self) -> LivenessSweep {
        let mut outcome = LivenessSweep::default();
        for connection in &mut self.connections {
            if connection.alive {
                connection.alive = false;
                outcome.probe.push(connection.id.clone());
            } else {
                outcome.terminate.push(connection.id.clone());
            }
        }
        outcome
    }

    /// Get a connection by id
    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.get(id).is_some()
    }

    /// Members in accept order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
