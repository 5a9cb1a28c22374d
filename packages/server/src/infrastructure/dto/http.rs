//! HTTP API response DTOs for the relay.

use serde::{Deserialize, Serialize};

/// One open connection in the debug listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSummaryDto {
    pub id: String,
    pub connected_at: String, // ISO 8601
    pub alive: bool,
}

/// Response for the connection listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionListDto {
    pub count: usize,
    pub connections: Vec<ConnectionSummaryDto>,
}
