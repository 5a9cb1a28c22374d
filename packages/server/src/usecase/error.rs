//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::RepositoryError;

/// Errors raised while accepting a connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Failed to allocate connection id: {0}")]
    IdGeneration(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors raised while relaying a frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Not JSON, unknown channel, or missing payload
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
}
