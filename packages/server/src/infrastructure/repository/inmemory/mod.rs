//! In-memory repository implementations.

mod connection;

pub use connection::{ClientInfo, InMemoryConnectionRepository};
