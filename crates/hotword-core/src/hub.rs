//! Hand-off point between the keyboard hook and the engine.
//!
//! The OS hook lives for the whole process and publishes every key event to
//! the hub. At most one engine generation is subscribed at a time; after
//! [`EventHub::unsubscribe`] returns, nothing more is sent to it.

use crate::error::{HotwordError, Result};
use crate::event::KeyEvent;
use crossbeam_channel::{unbounded, Receiver, RecvError, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

struct Slot {
    id: u64,
    tx: Sender<KeyEvent>,
}

#[derive(Default)]
pub struct EventHub {
    slot: Mutex<Option<Slot>>,
    next_id: AtomicU64,
}

/// Receiving end handed to a single engine generation.
pub struct Subscription {
    id: u64,
    rx: Receiver<KeyEvent>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the next event; fails once the subscription is released.
    pub fn recv(&self) -> std::result::Result<KeyEvent, RecvError> {
        self.rx.recv()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Slot>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(&self) -> Result<Subscription> {
        let mut slot = self.lock();
        if slot.is_some() {
            return Err(HotwordError::SubscriptionActive);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = unbounded();
        *slot = Some(Slot { id, tx });
        Ok(Subscription { id, rx })
    }

    /// Release subscription `id`. Unknown or stale ids are ignored.
    pub fn unsubscribe(&self, id: u64) {
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|s| s.id == id) {
            *slot = None;
        }
    }

    pub fn has_subscriber(&self) -> bool {
        self.lock().is_some()
    }

    /// Deliver `event` to the current subscriber. Returns false when nobody
    /// is listening.
    pub fn publish(&self, event: KeyEvent) -> bool {
        let slot = self.lock();
        match slot.as_ref() {
            Some(s) => s.tx.send(event).is_ok(),
            None => false,
        }
    }
}
