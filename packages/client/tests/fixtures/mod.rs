//! Test fixtures: an in-process relay and connected sync clients.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use pilgrim_sync_client::{ConnectionState, ReconnectPolicy, SyncClient};
use pilgrim_sync_server::RelayServer;
use tokio::{net::TcpListener, sync::oneshot};

pub struct TestRelay {
    pub relay: Arc<RelayServer>,
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestRelay {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let relay = Arc::new(RelayServer::new());

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

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// A client connected to this relay, once the relay has registered it
    pub async fn client(&self) -> Arc<SyncClient> {
        let expected = self.relay.connection_count().await + 1;
        let client = Arc::new(SyncClient::new(self.ws_url(), ReconnectPolicy::default()));
        client.connect();

        let mut changes = client.state_changes();
        tokio::time::timeout(
            Duration::from_secs(5),
            changes.wait_for(|s| *s == ConnectionState::Connected),
        )
        .await
        .expect("timed out connecting")
        .expect("state channel closed");

        self.wait_for_connections(expected).await;
        client
    }

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

impl Drop for TestRelay {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
