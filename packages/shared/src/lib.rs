//! Shared utilities for the Pilgrim Sync relay server and client.

pub mod logger;
pub mod time;
