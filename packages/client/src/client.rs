//! Typed sync client.
//!
//! ```text
//! Disconnected --connect()--> Connecting --ok--> Connected
//!                                  |                 |
//!                                 err          link closed
//!                                  v                 v
//!                       Disconnected (reconnect after base * attempt)
//! ```
//!
//! A background driver task owns the link. Every state change the driver
//! makes is tagged with the generation it was started under, so a driver
//! that `close()` already cancelled can never revive the connection. After
//! the reconnect policy is exhausted the client stays Disconnected until `connect()` is called
//! again. Transport errors never reach the application; they only show up
//! as state changes and log lines.

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use pilgrim_sync_server::{Channel, MessageFrame};
use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender},
        watch,
    },
    task::JoinHandle,
};

use crate::{
    domain::{Group, Pilgrim, SyncMessage, SyncedRecord, User},
    reconnect::{ReconnectPolicy, ReconnectState},
    subscription::{Handler, SubscriptionTable},
    transport::{Connector, Link, TransportResult, WebSocketConnector},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(name)
    }
}

pub struct SyncClient {
    inner: Arc<Inner>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

struct Inner {
    url: String,
    connector: Arc<dyn Connector>,
    policy: ReconnectPolicy,
    subscriptions: SubscriptionTable,
    state: watch::Sender<ConnectionState>,
    session: Mutex<Session>,
}

/// Link currently owned by the driver
#[derive(Default)]
struct Session {
    /// Bumped by `close()`; drivers started under an older value are stale
    generation: u64,
    outbound: Option<UnboundedSender<String>>,
}

impl SyncClient {
    /// Client for a WebSocket relay. Nothing happens until `connect()`.
    pub fn new(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self::with_connector(url, policy, Arc::new(WebSocketConnector))
    }

    pub fn with_connector(
        url: impl Into<String>,
        policy: ReconnectPolicy,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(Inner {
                url: url.into(),
                connector,
                policy,
                subscriptions: SubscriptionTable::new(),
                state,
                session: Mutex::new(Session::default()),
            }),
            driver: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Start the connection driver with a fresh attempt counter.
    ///
    /// No-op while a driver is still running. After the reconnect policy
    /// was exhausted this starts over.
    pub fn connect(&self) {
        let mut driver = self.driver.lock();
        if driver.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::debug!("Connection driver already running");
            return;
        }
        let generation = self.inner.session.lock().generation;
        *driver = Some(tokio::spawn(drive(self.inner.clone(), generation)));
    }

    /// Tear the connection down and cancel any pending reconnect.
    pub fn close(&self) {
        if let Some(handle) = self.driver.lock().take() {
            handle.abort();
        }
        // abort() lands at the driver's next await; until then the
        // generation check keeps it from touching the session
        let mut session = self.inner.session.lock();
        session.generation += 1;
        session.outbound = None;
        self.inner.set_state(ConnectionState::Disconnected);
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    /// Watch connection state transitions
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    pub fn subscribe(&self, channel: Channel, handler: Handler) {
        self.inner.subscriptions.subscribe(channel, handler);
    }

    pub fn unsubscribe(&self, channel: Channel, handler: &Handler) -> bool {
        self.inner.subscriptions.unsubscribe(channel, handler)
    }

    pub fn handler_count(&self, channel: Channel) -> usize {
        self.inner.subscriptions.handler_count(channel)
    }

    /// Subscribe a typed handler to `T`'s channel.
    ///
    /// Keep the returned handler to unsubscribe it later.
    pub fn on<T, F>(&self, f: F) -> Handler
    where
        T: SyncedRecord,
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(move |message: &SyncMessage| {
            if let Some(items) = T::from_message(message) {
                f(items);
            }
        });
        self.subscribe(T::CHANNEL, handler.clone());
        handler
    }

    /// Publish a message. Dropped when not Connected.
    ///
    /// Returns whether the frame was handed to the link.
    pub fn send(&self, message: &SyncMessage) -> bool {
        match message.encode() {
            Ok(text) => self.inner.send_text(message.channel(), text),
            Err(e) => {
                tracing::warn!("Dropping {} update: {}", message.channel(), e);
                false
            }
        }
    }

    /// Publish a whole collection on its channel
    pub fn publish<T: SyncedRecord>(&self, items: &[T]) -> bool {
        let frame = MessageFrame {
            r#type: T::CHANNEL,
            data: items,
        };
        match serde_json::to_string(&frame) {
            Ok(text) => self.inner.send_text(T::CHANNEL, text),
            Err(e) => {
                tracing::warn!("Dropping {} update: {}", T::CHANNEL, e);
                false
            }
        }
    }

    pub fn sync_pilgrims(&self, pilgrims: &[Pilgrim]) -> bool {
        self.publish(pilgrims)
    }

    pub fn sync_groups(&self, groups: &[Group]) -> bool {
        self.publish(groups)
    }

    pub fn sync_users(&self, users: &[User]) -> bool {
        self.publish(users)
    }
}

impl Drop for SyncClient {
    fn drop(&mut self) {
        if let Some(handle) = self.driver.get_mut().take() {
            handle.abort();
        }
    }
}

impl Inner {
    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            tracing::debug!("Connection state: {} -> {}", previous, state);
        }
    }

    /// Driver-side state change. Returns `false`, changing nothing, once the
    /// driver started under `generation` was closed.
    fn transition(
        &self,
        generation: u64,
        state: ConnectionState,
        outbound: Option<UnboundedSender<String>>,
    ) -> bool {
        let mut session = self.session.lock();
        if session.generation != generation {
            return false;
        }
        session.outbound = outbound;
        self.set_state(state);
        true
    }

    fn send_text(&self, channel: Channel, text: String) -> bool {
        let session = self.session.lock();
        if *self.state.borrow() != ConnectionState::Connected {
            tracing::debug!("Not connected, dropping {} update", channel);
            return false;
        }
        match session.outbound.as_ref() {
            Some(tx) => tx.send(text).is_ok(),
            None => {
                tracing::debug!("No open link, dropping {} update", channel);
                false
            }
        }
    }

    fn on_frame(&self, raw: &str) {
        match SyncMessage::decode(raw) {
            Ok(message) => {
                let invoked = self.subscriptions.dispatch(&message);
                tracing::debug!(
                    "Dispatched {} ({} records) to {} handler(s)",
                    message.channel(),
                    message.len(),
                    invoked
                );
            }
            Err(e) => tracing::warn!("Ignoring frame: {}", e),
        }
    }

    /// Shuttle frames until the link closes
    async fn pump(&self, link: &mut dyn Link, outbound: &mut UnboundedReceiver<String>) {
        enum Event {
            Inbound(TransportResult<Option<String>>),
            Outbound(String),
        }

        loop {
            let event = tokio::select! {
                inbound = link.recv() => Event::Inbound(inbound),
                Some(text) = outbound.recv() => Event::Outbound(text),
            };

            match event {
                Event::Inbound(Ok(Some(text))) => self.on_frame(&text),
                Event::Inbound(Ok(None)) => {
                    tracing::info!("Relay closed the connection");
                    return;
                }
                Event::Inbound(Err(e)) => {
                    tracing::warn!("Connection lost: {}", e);
                    return;
                }
                Event::Outbound(text) => {
                    if let Err(e) = link.send(text).await {
                        tracing::warn!("Connection lost: {}", e);
                        return;
                    }
                }
            }
        }
    }
}

async fn drive(inner: Arc<Inner>, generation: u64) {
    let mut reconnect = ReconnectState::new(inner.policy);

    loop {
        if !inner.transition(generation, ConnectionState::Connecting, None) {
            return;
        }
        let current = match inner.connector.connect(&inner.url).await {
            Ok(mut link) => {
                reconnect.reset();
                let (tx, mut rx) = mpsc::unbounded_channel();
                if !inner.transition(generation, ConnectionState::Connected, Some(tx)) {
                    tracing::debug!("Closed while connecting, dropping link");
                    link.close().await;
                    return;
                }
                tracing::info!("Connected to {}", inner.url);

                inner.pump(link.as_mut(), &mut rx).await;

                let current = inner.transition(generation, ConnectionState::Disconnected, None);
                link.close().await;
                current
            }
            Err(e) => {
                tracing::warn!("Failed to connect to {}: {}", inner.url, e);
                inner.transition(generation, ConnectionState::Disconnected, None)
            }
        };
        if !current {
            return;
        }

        match reconnect.next_delay() {
            Some(delay) => {
                tracing::info!(
                    "Reconnecting in {:?} (attempt {}/{})",
                    delay,
                    reconnect.attempts(),
                    inner.policy.max_attempts
                );
                tokio::time::sleep(delay).await;
            }
            None => {
                tracing::warn!(
                    "Giving up after {} reconnect attempts",
                    inner.policy.max_attempts
                );
                return;
            }
        }
    }
}
