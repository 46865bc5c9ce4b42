//! # Publishers
//!
//! Partitions publish only after a transaction commits. The bus never
//! sees a notification for work that was rolled back.

use crate::events::{EventFilter, LedgerNotification};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Sink for committed ledger notifications.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hand a notification to every live subscriber; returns how many got it.
    async fn publish(&self, notification: LedgerNotification) -> usize;

    /// Notifications accepted since construction.
    fn events_published(&self) -> u64;
}

/// Process-local fan-out bus.
///
/// Every subscriber gets its own bounded queue of `capacity` notifications.
pub struct InMemoryEventBus {
    fanout: broadcast::Sender<LedgerNotification>,
    accepted: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus sized with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus whose subscribers lag after `capacity` unread notifications.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (fanout, _) = broadcast::channel(capacity);
        Self {
            fanout,
            accepted: AtomicU64::new(0),
            capacity,
        }
    }

    /// Open a subscription. It only sees notifications published after this call.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, sources = ?filter.sources, "[bus] subscription opened");
        Subscription::new(self.fanout.subscribe(), filter)
    }

    /// Live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.fanout.receiver_count()
    }

    /// Per-subscriber queue bound.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, notification: LedgerNotification) -> usize {
        self.accepted.fetch_add(1, Ordering::Relaxed);
        let event = notification.event.name();
        let source = notification.source.clone();

        // A send error only means nobody is listening yet.
        let receivers = self.fanout.send(notification).unwrap_or(0);
        trace!(event, %source, receivers, "[bus] published");
        receivers
    }

    fn events_published(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }
}

/// Publisher that discards everything.
#[derive(Debug, Default)]
pub struct NoOpPublisher {
    published: AtomicU64,
}

#[async_trait]
impl EventPublisher for NoOpPublisher {
    async fn publish(&self, _notification: LedgerNotification) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        0
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

/// Publisher that keeps every notification, for assertions.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<LedgerNotification>>,
}

impl RecordingPublisher {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    pub fn published(&self) -> Vec<LedgerNotification> {
        self.published.lock().clone()
    }

    /// Names of the published events, in order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.published.lock().iter().map(|n| n.event.name()).collect()
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.published.lock().clear();
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, notification: LedgerNotification) -> usize {
        self.published.lock().push(notification);
        1
    }

    fn events_published(&self) -> u64 {
        self.published.lock().len() as u64
    }
}
