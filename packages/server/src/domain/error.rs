//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId invalid format error (not a valid UUID format)
    #[error("ConnectionId must be a valid UUID format (got: {0})")]
    ConnectionIdInvalidFormat(String),
}

/// Errors related to Connection Set membership
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionSetError {
    /// A connection with the same id is already a member
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),
}

/// Errors raised by connection repositories
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    /// The connection's outbound channel is closed (socket task ended)
    #[error("Connection '{0}' is closed")]
    ConnectionClosed(String),
}

impl From<ConnectionSetError> for RepositoryError {
    fn from(err: ConnectionSetError) -> Self {
        match err {
            ConnectionSetError::DuplicateConnection(id) => RepositoryError::DuplicateConnection(id),
        }
    }
}
