//! # Ledger Ports
//!
//! The store is consumed, not implemented, by the registry services. These
//! traits describe exactly what the services rely on.

use crate::errors::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_bus::{EventPublisher, LedgerEvent, LedgerNotification};
use shared_types::{PartitionId, RegistryError};
use tracing::debug;

/// One committed value of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Committing transaction
    pub tx_ref: String,
    /// Raw value written
    pub value: Vec<u8>,
    /// Commit time
    pub timestamp: DateTime<Utc>,
}

/// Proof of a commit and the events it released.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    /// Committing partition
    pub partition: PartitionId,
    /// Transaction reference
    pub tx_ref: String,
    /// Commit time
    pub committed_at: DateTime<Utc>,
    /// Events emitted by the transaction, in emission order
    pub events: Vec<LedgerEvent>,
}

impl TxReceipt {
    /// Wrap each event in a notification envelope.
    pub fn notifications(&self) -> Vec<LedgerNotification> {
        self.events
            .iter()
            .cloned()
            .map(|event| LedgerNotification {
                source: self.partition.clone(),
                tx_ref: self.tx_ref.clone(),
                emitted_at: self.committed_at,
                event,
            })
            .collect()
    }
}

/// An open serializable transaction on one partition.
pub trait LedgerTransaction {
    /// Reference assigned at `begin`.
    fn tx_ref(&self) -> &str;

    /// Read a key, seeing this transaction's own writes.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stage a write.
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Ordered entries whose key starts with `prefix`, including staged
    /// writes.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;

    /// Stage an event, released only if the transaction commits.
    fn emit(&mut self, event: LedgerEvent);

    /// Apply all staged writes atomically.
    fn commit(self: Box<Self>) -> Result<TxReceipt, StoreError>;
}

/// A partition's ordered, linearizable key-value ledger.
pub trait LedgerStore: Send + Sync {
    /// Partition this store belongs to.
    fn partition(&self) -> &PartitionId;

    /// Open a transaction. Transactions on one partition are serialized.
    ///
    /// Committed reads on the same store must not be issued while the
    /// returned transaction is open.
    fn begin(&self) -> Box<dyn LedgerTransaction + '_>;

    /// Read a committed value.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Ordered committed entries whose key starts with `prefix`.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;

    /// Every committed value of `key`, oldest first.
    fn history(&self, key: &str) -> Result<Vec<HistoryEntry>, StoreError>;
}

/// Run `work` in one transaction and commit it.
///
/// If `work` fails the transaction is dropped and nothing is written.
pub fn transact<R>(
    store: &dyn LedgerStore,
    work: impl FnOnce(&mut dyn LedgerTransaction) -> Result<R, RegistryError>,
) -> Result<(R, TxReceipt), RegistryError> {
    let mut tx = store.begin();
    let output = work(tx.as_mut())?;
    let receipt = tx.commit()?;
    Ok((output, receipt))
}

/// Publish every event of a committed transaction.
pub async fn publish_receipt(publisher: &dyn EventPublisher, receipt: &TxReceipt) {
    for notification in receipt.notifications() {
        let event = notification.event.name();
        let receivers = publisher.publish(notification).await;
        debug!(
            partition = %receipt.partition,
            tx_ref = %receipt.tx_ref,
            event,
            receivers,
            "Released committed event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedger;
    use shared_bus::{RecordingPublisher, RegionRegistered};
    use shared_types::RegionCode;

    fn registered() -> LedgerEvent {
        let region = RegionCode::parse("TS").unwrap();
        LedgerEvent::RegionRegistered(RegionRegistered {
            name: "Telangana".into(),
            partition: PartitionId::for_region(&region),
            region,
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn test_transact_commits_on_success() {
        let store = InMemoryLedger::new(PartitionId::authority());
        let (value, receipt) = transact(&store, |tx| {
            tx.put("k", b"v".to_vec())?;
            tx.emit(registered());
            Ok(7)
        })
        .unwrap();

        assert_eq!(value, 7);
        assert_eq!(receipt.events.len(), 1);
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_transact_discards_on_error() {
        let store = InMemoryLedger::new(PartitionId::authority());
        let result: Result<((), TxReceipt), RegistryError> = transact(&store, |tx| {
            tx.put("k", b"v".to_vec())?;
            tx.emit(registered());
            Err(RegistryError::invalid("k", "forced"))
        });

        assert!(result.is_err());
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.history("k").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_receipt_wraps_envelope() {
        let store = InMemoryLedger::new(PartitionId::authority());
        let (_, receipt) = transact(&store, |tx| {
            tx.emit(registered());
            Ok(())
        })
        .unwrap();

        let recorder = RecordingPublisher::new();
        publish_receipt(&recorder, &receipt).await;

        let published = recorder.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].source, PartitionId::authority());
        assert_eq!(published[0].tx_ref, receipt.tx_ref);
    }
}
