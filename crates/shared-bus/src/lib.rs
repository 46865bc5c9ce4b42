//! # Shared Bus - Notification Delivery Between Partitions
//!
//! Partitions never call each other. Each committed transaction emits
//! immutable [`LedgerEvent`]s, wrapped in a [`LedgerNotification`] envelope,
//! and a relay observes them and issues the next transaction.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Region (TS)  │                    │  Authority   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐   ┌──────────────┐
//!                  │  Event Bus   │──▶│    Relay     │
//!                  └──────────────┘   └──────────────┘
//!                       subscribe()
//! ```
//!
//! Delivery is at-least-once from the point of view of the protocol: every
//! receiving step is guarded so a redelivered notification converges.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{
    ApplicationSubmitted, DocumentLinked, EventFilter, EventTopic, IdentifierIssued,
    IdentifierRequested, LedgerEvent, LedgerNotification, PropertyApproved, PropertyTransferred,
    RegionRecordCreated, RegionRegistered, VerificationCompleted,
};
pub use publisher::{EventPublisher, InMemoryEventBus, NoOpPublisher, RecordingPublisher};
pub use subscriber::{Subscription, SubscriptionError};

/// Current notification schema version.
pub const PROTOCOL_VERSION: u16 = 1;

/// Maximum notifications to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_version() {
        assert_eq!(PROTOCOL_VERSION, 1);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
    }
}
