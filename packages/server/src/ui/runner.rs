//! Relay server wiring: router, liveness sweeper and serve loop.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tokio::{
    net::TcpListener,
    sync::Mutex,
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServerConfig,
    domain::ConnectionRepository,
    error::ServerError,
    infrastructure::repository::InMemoryConnectionRepository,
    usecase::LivenessUseCase,
};

use super::{
    handler::{health_check, list_connections, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// An explicitly constructed relay instance.
///
/// Each instance owns its own Connection Set, so several relays can run in
/// one process (tests do this).
pub struct RelayServer {
    state: Arc<AppState>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl RelayServer {
    pub fn new() -> Self {
        Self::with_repository(Arc::new(InMemoryConnectionRepository::new()))
    }

    pub fn with_repository(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self {
            state: Arc::new(AppState::new(repository)),
            sweeper: Mutex::new(None),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        Router::new()
            .route("/ws", get(websocket_handler))
            .route("/health", get(health_check))
            .route("/api/connections", get(list_connections))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the periodic liveness sweep. Replaces a sweeper that is
    /// already running.
    pub async fn start_liveness_sweep(&self, interval: Duration) {
        let repository = self.state.repository.clone();
        let handle = tokio::spawn(run_liveness_sweep(repository, interval));

        let mut sweeper = self.sweeper.lock().await;
        if let Some(previous) = sweeper.replace(handle) {
            previous.abort();
        }
        tracing::info!("Liveness sweep every {:?}", interval);
    }

    /// Stop the liveness sweeper. Open connections are left alone.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.sweeper.lock().await.take() {
            handle.abort();
            tracing::info!("Liveness sweep stopped");
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.state.repository.count_connections().await
    }

    /// Serve HTTP and WebSocket requests until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)
    }
}

impl Default for RelayServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_liveness_sweep(repository: Arc<dyn ConnectionRepository>, interval: Duration) {
    let usecase = LivenessUseCase::new(repository);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        usecase.sweep().await;
    }
}

/// Bind, start the liveness sweep and serve until Ctrl+C / SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Relay listening on ws://{}/ws", addr);

    let relay = RelayServer::new();
    relay.start_liveness_sweep(config.sweep_interval).await;

    let result = relay.serve(listener, shutdown_signal()).await;
    relay.shutdown().await;
    result
}
