//! Per-collection synchronizer.
//!
//! Binds one local collection to its channel. Local changes publish the
//! whole collection; an inbound update replaces the local collection
//! wholesale. There is no merge and no conflict detection: when two peers
//! edit concurrently, whichever update arrives last wins.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{client::SyncClient, domain::SyncedRecord, subscription::Handler};

pub struct CollectionSync<T: SyncedRecord> {
    client: Arc<SyncClient>,
    items: Arc<RwLock<Vec<T>>>,
    handler: Handler,
}

impl<T: SyncedRecord> CollectionSync<T> {
    pub fn new(client: Arc<SyncClient>) -> Self {
        Self::with_on_change(client, |_| {})
    }

    /// `on_change` runs after a remote update was applied
    pub fn with_on_change<F>(client: Arc<SyncClient>, on_change: F) -> Self
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        let items = Arc::new(RwLock::new(Vec::new()));
        let target = items.clone();
        // Remote updates are applied, never republished
        let handler = client.on::<T, _>(move |received| {
            *target.write() = received.to_vec();
            on_change(received);
        });

        Self {
            client,
            items,
            handler,
        }
    }

    /// Snapshot of the local collection
    pub fn items(&self) -> Vec<T> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Store `items` and publish them. Returns whether the update was sent.
    pub fn replace(&self, items: Vec<T>) -> bool {
        *self.items.write() = items;
        self.publish()
    }

    /// Mutate the local collection in place, then publish it
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Vec<T>),
    {
        f(&mut self.items.write());
        self.publish()
    }

    /// Publish the current collection again
    pub fn publish(&self) -> bool {
        let snapshot = self.items();
        self.client.publish(&snapshot)
    }
}

impl<T: SyncedRecord> Drop for CollectionSync<T> {
    fn drop(&mut self) {
        self.client.unsubscribe(T::CHANNEL, &self.handler);
    }
}
