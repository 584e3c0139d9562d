//! Change Notifier.
//!
//! # Responsibility
//! - Keep observer registrations keyed by resource identifier.
//! - Fan a change signal out to every interested observer.
//!
//! # Invariants
//! - Delivery is fire-and-forget; a slow or gone observer never blocks or
//!   fails a mutation. A full queue drops the event for that observer only.
//! - An observer on `U` hears changes to `U`, to any ancestor of `U`, and to
//!   descendants of `U` when registered with `notify_for_descendants`.

use crate::uri::ResourceUri;
use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Pending events one subscription may hold; further events are dropped
/// until it drains.
pub const SUBSCRIPTION_CAPACITY: usize = 64;

/// Signal that the data behind `uri` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub uri: ResourceUri,
}

struct Observer {
    id: u64,
    uri: ResourceUri,
    notify_for_descendants: bool,
    sender: Sender<ChangeEvent>,
}

impl Observer {
    fn wants(&self, changed: &ResourceUri) -> bool {
        self.uri == *changed
            || changed.is_ancestor_of(&self.uri)
            || (self.notify_for_descendants && self.uri.is_ancestor_of(changed))
    }
}

/// Receiving end of one observer registration.
#[derive(Debug)]
pub struct ChangeSubscription {
    id: u64,
    receiver: Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next pending event without blocking.
    pub fn try_next(&self) -> Option<ChangeEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Drains everything delivered so far.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        self.receiver.try_iter().collect()
    }

    pub fn receiver(&self) -> &Receiver<ChangeEvent> {
        &self.receiver
    }
}

/// Observer registry shared by one store.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    observers: Mutex<Vec<Observer>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, uri: ResourceUri, notify_for_descendants: bool) -> ChangeSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = bounded(SUBSCRIPTION_CAPACITY);
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Observer {
                id,
                uri,
                notify_for_descendants,
                sender,
            });
        ChangeSubscription { id, receiver }
    }

    /// Removes a registration. Returns whether it existed.
    pub fn unregister(&self, id: u64) -> bool {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|observer| observer.id != id);
        observers.len() != before
    }

    /// Delivers a change to every matching observer; returns how many heard it.
    pub fn notify_change(&self, uri: &ResourceUri) -> usize {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let mut delivered = 0;
        let mut dropped = 0;
        // Dropped subscriptions show up as disconnects and are pruned here.
        observers.retain(|observer| {
            if !observer.wants(uri) {
                return true;
            }
            let event = ChangeEvent { uri: uri.clone() };
            match observer.sender.try_send(event) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    dropped += 1;
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            }
        });
        debug!(
            "event=notify_change module=notify uri={uri} delivered={delivered} dropped={dropped}"
        );
        delivered
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
