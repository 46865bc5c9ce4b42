//! # Subscriptions
//!
//! A relay holds one [`Subscription`] per partition set it serves. The
//! subscription drops notifications outside its filter before handing
//! them out, so a relay only ever sees the topics it acts on.

use crate::events::{EventFilter, LedgerNotification};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

/// Why a subscription can yield nothing further.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every publisher handle is gone.
    #[error("notification bus closed")]
    Closed,
}

/// Filtered view over the bus.
pub struct Subscription {
    inbox: broadcast::Receiver<LedgerNotification>,
    filter: EventFilter,
    skipped: u64,
}

impl Subscription {
    pub(crate) fn new(inbox: broadcast::Receiver<LedgerNotification>, filter: EventFilter) -> Self {
        Self {
            inbox,
            filter,
            skipped: 0,
        }
    }

    /// Wait for the next notification this subscription accepts.
    ///
    /// Returns `None` once the bus is gone. Notifications lost to lag are
    /// counted in [`Subscription::skipped`]; the handshake state on each
    /// partition stays queryable, so a lagging relay can catch up from there.
    pub async fn recv(&mut self) -> Option<LedgerNotification> {
        loop {
            match self.inbox.recv().await {
                Ok(notification) if self.filter.matches(&notification) => {
                    return Some(notification)
                }
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => self.note_lag(missed),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take an already-queued notification without waiting.
    ///
    /// `Ok(None)` means the queue holds nothing this subscription accepts.
    pub fn try_recv(&mut self) -> Result<Option<LedgerNotification>, SubscriptionError> {
        loop {
            match self.inbox.try_recv() {
                Ok(notification) if self.filter.matches(&notification) => {
                    return Ok(Some(notification))
                }
                Ok(_) => {}
                Err(TryRecvError::Lagged(missed)) => self.note_lag(missed),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    /// Filter applied to incoming notifications.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Notifications overwritten before this subscription read them.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn note_lag(&mut self, missed: u64) {
        self.skipped += missed;
        warn!(missed, total = self.skipped, "[bus] subscription lagged");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!(topics = ?self.filter.topics, skipped = self.skipped, "[bus] subscription closed");
    }
}
