//! Domain layer for the sync relay.
//!
//! This module contains the connection bookkeeping rules (membership, fan-out
//! targets, liveness) independent of the WebSocket transport and DTOs.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Connection, ConnectionSet, LivenessSweep, OutboundMessage};
pub use error::{ConnectionSetError, RepositoryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::ConnectionRepository;
pub use value_object::{ConnectionId, Timestamp};
