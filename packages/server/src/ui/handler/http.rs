//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use pilgrim_sync_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    infrastructure::dto::http::{ConnectionListDto, ConnectionSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint listing the open connections
pub async fn list_connections(State(state): State<Arc<AppState>>) -> Json<ConnectionListDto> {
    let connections = state.repository.get_connections().await;

    Json(ConnectionListDto {
        count: connections.len(),
        connections: connections
            .into_iter()
            .map(|c| ConnectionSummaryDto {
                id: c.id.into_string(),
                connected_at: timestamp_to_jst_rfc3339(c.connected_at.value()),
                alive: c.alive,
            })
            .collect(),
    })
}
