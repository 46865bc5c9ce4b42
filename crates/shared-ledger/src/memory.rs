//! In-Memory Ledger Adapter
//!
//! Implements [`LedgerStore`] for one partition. A transaction holds the
//! partition lock from `begin` until commit or drop, so transactions on the
//! same partition are serialized.

use crate::errors::StoreError;
use crate::ports::{HistoryEntry, LedgerStore, LedgerTransaction, TxReceipt};
use parking_lot::{Mutex, MutexGuard};
use shared_bus::LedgerEvent;
use shared_types::{PartitionId, SystemTimeSource, TimeSource};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Default)]
struct PartitionState {
    entries: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<HistoryEntry>>,
    commits: u64,
}

/// Single-partition in-memory ledger.
pub struct InMemoryLedger {
    partition: PartitionId,
    state: Mutex<PartitionState>,
    clock: Arc<dyn TimeSource>,
    /// Next commit fails with `CommitRejected` (fault injection).
    fail_next_commit: AtomicBool,
}

impl InMemoryLedger {
    /// Empty ledger on the system clock.
    pub fn new(partition: PartitionId) -> Self {
        Self::with_clock(partition, Arc::new(SystemTimeSource))
    }

    /// Empty ledger stamping commits with `clock`.
    pub fn with_clock(partition: PartitionId, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            partition,
            state: Mutex::new(PartitionState::default()),
            clock,
            fail_next_commit: AtomicBool::new(false),
        }
    }

    /// Make the next commit fail without writing anything.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Number of committed transactions.
    pub fn commit_count(&self) -> u64 {
        self.state.lock().commits
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn prefix_range(
    entries: &BTreeMap<String, Vec<u8>>,
    prefix: &str,
) -> Vec<(String, Vec<u8>)> {
    entries
        .range(prefix.to_string()..)
        .take_while(|(k, _)| k.starts_with(prefix))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

impl LedgerStore for InMemoryLedger {
    fn partition(&self) -> &PartitionId {
        &self.partition
    }

    fn begin(&self) -> Box<dyn LedgerTransaction + '_> {
        Box::new(InMemoryTransaction {
            guard: self.state.lock(),
            ledger: self,
            tx_ref: Uuid::new_v4().to_string(),
            writes: BTreeMap::new(),
            events: Vec::new(),
        })
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.lock().entries.get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        Ok(prefix_range(&self.state.lock().entries, prefix))
    }

    fn history(&self, key: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self
            .state
            .lock()
            .history
            .get(key)
            .cloned()
            .unwrap_or_default())
    }
}

struct InMemoryTransaction<'a> {
    guard: MutexGuard<'a, PartitionState>,
    ledger: &'a InMemoryLedger,
    tx_ref: String,
    writes: BTreeMap<String, Vec<u8>>,
    events: Vec<LedgerEvent>,
}

impl LedgerTransaction for InMemoryTransaction<'_> {
    fn tx_ref(&self) -> &str {
        &self.tx_ref
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .writes
            .get(key)
            .or_else(|| self.guard.entries.get(key))
            .cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<String, Vec<u8>> =
            prefix_range(&self.guard.entries, prefix).into_iter().collect();
        merged.extend(prefix_range(&self.writes, prefix));
        Ok(merged.into_iter().collect())
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    fn commit(self: Box<Self>) -> Result<TxReceipt, StoreError> {
        let InMemoryTransaction {
            mut guard,
            ledger,
            tx_ref,
            writes,
            events,
        } = *self;

        if ledger.fail_next_commit.swap(false, Ordering::SeqCst) {
            warn!(partition = %ledger.partition, %tx_ref, "Commit rejected by fault injection");
            return Err(StoreError::CommitRejected {
                tx_ref,
                reason: "injected commit failure".to_string(),
            });
        }

        let committed_at = ledger.clock.now();
        let write_count = writes.len();
        for (key, value) in writes {
            guard.history.entry(key.clone()).or_default().push(HistoryEntry {
                tx_ref: tx_ref.clone(),
                value: value.clone(),
                timestamp: committed_at,
            });
            guard.entries.insert(key, value);
        }
        guard.commits += 1;

        debug!(
            partition = %ledger.partition,
            %tx_ref,
            writes = write_count,
            events = events.len(),
            "Transaction committed"
        );

        Ok(TxReceipt {
            partition: ledger.partition.clone(),
            tx_ref,
            committed_at,
            events,
        })
    }
}
