//! Channel Subscription Table.
//!
//! Dispatch iterates over a snapshot of the handler list taken under the
//! lock, so handlers may subscribe or unsubscribe (themselves or a sibling)
//! while a frame is being dispatched. Changes take effect from the next
//! frame on.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use pilgrim_sync_server::Channel;

use crate::domain::SyncMessage;

/// Callback invoked with every message on its channel
pub type Handler = Arc<dyn Fn(&SyncMessage) + Send + Sync>;

#[derive(Default)]
pub struct SubscriptionTable {
    handlers: Mutex<HashMap<Channel, Vec<Handler>>>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler`. The same handler may be registered more than once.
    pub fn subscribe(&self, channel: Channel, handler: Handler) {
        self.handlers.lock().entry(channel).or_default().push(handler);
    }

    /// Remove the first registration of `handler` (pointer equality).
    ///
    /// Returns `false` if it was not registered.
    pub fn unsubscribe(&self, channel: Channel, handler: &Handler) -> bool {
        let mut handlers = self.handlers.lock();
        let Some(list) = handlers.get_mut(&channel) else {
            return false;
        };
        match list.iter().position(|h| Arc::ptr_eq(h, handler)) {
            Some(index) => {
                list.remove(index);
                if list.is_empty() {
                    handlers.remove(&channel);
                }
                true
            }
            None => false,
        }
    }

    /// Invoke every handler for the message's channel in registration order.
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, message: &SyncMessage) -> usize {
        let snapshot = self.snapshot(message.channel());
        for handler in &snapshot {
            handler(message);
        }
        snapshot.len()
    }

    pub fn handler_count(&self, channel: Channel) -> usize {
        self.handlers.lock().get(&channel).map_or(0, Vec::len)
    }

    fn snapshot(&self, channel: Channel) -> Vec<Handler> {
        self.handlers
            .lock()
            .get(&channel)
            .cloned()
            .unwrap_or_default()
    }
}
