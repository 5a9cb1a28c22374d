//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ConnectionId, OutboundMessage},
    ui::state::AppState,
    usecase::{
        ConnectPeerUseCase, DisconnectPeerUseCase, LivenessUseCase, RelayError,
        RelayFrameUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Create a channel for this connection to receive relayed frames and probes
    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundMessage>();
    // Fired by the liveness sweep; a blocked write must not delay it
    let (terminate_tx, mut terminate_rx) = oneshot::channel::<()>();

    let connect_usecase = ConnectPeerUseCase::new(state.repository.clone());
    let connection_id = match connect_usecase.execute(tx, terminate_tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    tracing::info!("Connection '{}' accepted", connection_id);

    let (mut sender, mut receiver) = socket.split();

    let recv_state = state.clone();
    let recv_id = connection_id.clone();

    // Spawn a task to receive frames from this peer
    let mut recv_task = tokio::spawn(async move {
        let relay_usecase = RelayFrameUseCase::new(recv_state.repository.clone());
        let liveness_usecase = LivenessUseCase::new(recv_state.repository.clone());

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    relay_text(&relay_usecase, &recv_id, text.as_str()).await;
                }
                Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                    Ok(text) => relay_text(&relay_usecase, &recv_id, text).await,
                    Err(_) => {
                        tracing::warn!("Dropping non UTF-8 binary frame from '{}'", recv_id);
                    }
                },
                Message::Pong(_) => {
                    liveness_usecase.record_pong(&recv_id).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping from '{}'", recv_id);
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_id);
                    break;
                }
            }
        }
    });

    let send_id = connection_id.clone();

    // Spawn a task to deliver relayed frames and probes to this peer
    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            let result = match outbound {
                OutboundMessage::Text(text) => sender.send(Message::Text(text.into())).await,
                OutboundMessage::Ping => sender.send(Message::Ping(Bytes::new())).await,
            };
            if let Err(e) = result {
                tracing::debug!("Failed to write to '{}': {}", send_id, e);
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other.
    // Termination aborts both, which drops the socket without a close handshake.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
        _ = &mut terminate_rx => {
            tracing::info!("Terminating connection '{}'", connection_id);
            recv_task.abort();
            send_task.abort();
        }
    };

    let disconnect_usecase = DisconnectPeerUseCase::new(state.repository.clone());
    if disconnect_usecase.execute(&connection_id).await {
        tracing::info!(
            "Connection '{}' closed ({} remaining)",
            connection_id,
            disconnect_usecase.count_remaining_connections().await
        );
    } else {
        tracing::debug!("Connection '{}' was already removed", connection_id);
    }
}

async fn relay_text(usecase: &RelayFrameUseCase, from: &ConnectionId, text: &str) {
    match usecase.execute(from, text).await {
        Ok(outcome) => {
            tracing::debug!(
                "Relayed {} from '{}' to {} peer(s)",
                outcome.channel,
                from,
                outcome.delivered
            );
        }
        Err(RelayError::MalformedFrame(e)) => {
            tracing::warn!("Dropping malformed frame from '{}': {}", from, e);
        }
    }
}
