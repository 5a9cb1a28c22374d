//! Test fixtures: an in-process relay bound to an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use pilgrim_sync_server::RelayServer;
use tokio::{net::TcpListener, sync::oneshot};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct TestServer {
    pub relay: Arc<RelayServer>,
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a relay without a liveness sweeper
    pub async fn start() -> Self {
        Self::start_inner(None).await
    }

    /// Start a relay whose liveness sweep runs every `interval`
    pub async fn start_with_sweep(interval: Duration) -> Self {
        Self::start_inner(Some(interval)).await
    }

    async fn start_inner(sweep: Option<Duration>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let relay = Arc::new(RelayServer::new());
        if let Some(interval) = sweep {
            relay.start_liveness_sweep(interval).await;
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let serving = relay.clone();
        tokio::spawn(async move {
            let _ = serving
                .serve(listener, async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            relay,
            addr,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn connect(&self) -> WsStream {
        let (stream, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect to relay");
        stream
    }

    /// Wait until the relay has registered `expected` connections
    pub async fn wait_for_connections(&self, expected: usize) {
        for _ in 0..100 {
            if self.relay.connection_count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!(
            "expected {} connections, found {}",
            expected,
            self.relay.connection_count().await
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn send_text(stream: &mut WsStream, text: &str) {
    stream
        .send(Message::Text(text.into()))
        .await
        .expect("Failed to send frame");
}

/// Next text frame, answering pings along the way
pub async fn recv_text(stream: &mut WsStream, timeout: Duration) -> Option<String> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let next = tokio::time::timeout_at(deadline, stream.next()).await.ok()??;
        match next.ok()? {
            Message::Text(text) => return Some(text.as_str().to_string()),
            Message::Close(_) => return None,
            _ => continue,
        }
    }
}
