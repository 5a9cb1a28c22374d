//! Domain errors of the sync client.

use thiserror::Error;

/// Errors decoding or encoding a Message Frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("Failed to decode frame: {0}")]
    Decode(String),

    #[error("Failed to encode frame: {0}")]
    Encode(String),
}
