//! Domain types of the sync client: records and the typed message union.

pub mod error;
pub mod message;
pub mod record;

pub use error::MessageError;
pub use message::SyncMessage;
pub use record::{Group, Pilgrim, SyncedRecord, User};
