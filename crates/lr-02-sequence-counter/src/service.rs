//! Sequence Counter Service

use crate::config::SequenceConfig;
use crate::domain::{invariant_next_follows, invariant_within_ceiling, CounterRecord};
use shared_ledger::{load, read_record, write_record, LedgerStore, LedgerTransaction};
use shared_types::keys::counter_key;
use shared_types::{Epoch, RegionCode, RegistryError};
use tracing::{debug, error};

/// Allocates sequence numbers inside a caller-owned transaction.
///
/// Holds no counter state in memory; every call reads the ledger.
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    config: SequenceConfig,
}

impl SequenceCounter {
    /// Counter with default ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter with custom config.
    pub fn with_config(config: SequenceConfig) -> Self {
        Self { config }
    }

    /// Enforced ceiling.
    pub fn ceiling(&self) -> u64 {
        self.config.effective_ceiling()
    }

    /// Allocate the next sequence for (region, epoch).
    ///
    /// The incremented counter is staged in `tx`; it becomes visible only if
    /// `tx` commits. Fails with `SequenceExhausted` past the ceiling, leaving
    /// the counter untouched.
    pub fn next(
        &self,
        tx: &mut dyn LedgerTransaction,
        region: &RegionCode,
        epoch: Epoch,
    ) -> Result<u64, RegistryError> {
        let key = counter_key(region, epoch);
        let mut record = read_record::<CounterRecord>(tx, &key)?
            .unwrap_or_else(|| CounterRecord::fresh(region.clone(), epoch));

        let ceiling = self.ceiling();
        let previous = record.sequence;
        let next = previous.saturating_add(1);
        if !invariant_within_ceiling(next, ceiling) {
            error!(
                region = %region,
                epoch = %epoch,
                ceiling,
                "[lr-02] Sequence exhausted; operator intervention required"
            );
            return Err(RegistryError::SequenceExhausted {
                region: region.to_string(),
                epoch: epoch.value(),
                ceiling,
            });
        }
        debug_assert!(invariant_next_follows(previous, next));

        record.sequence = next;
        write_record(tx, &key, &record)?;

        debug!(key = %key, sequence = next, tx_ref = tx.tx_ref(), "[lr-02] Sequence allocated");
        Ok(next)
    }

    /// Last committed allocation for (region, epoch); 0 if none.
    pub fn current(
        &self,
        store: &dyn LedgerStore,
        region: &RegionCode,
        epoch: Epoch,
    ) -> Result<u64, RegistryError> {
        Ok(load::<CounterRecord>(store, &counter_key(region, epoch))?
            .map(|record| record.sequence)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use shared_ledger::{transact, InMemoryLedger};
    use shared_types::PartitionId;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::thread;

    fn region(code: &str) -> RegionCode {
        RegionCode::parse(code).unwrap()
    }

    fn authority() -> InMemoryLedger {
        InMemoryLedger::new(PartitionId::authority())
    }

    #[test]
    fn test_first_allocation_is_one() {
        let store = authority();
        let counter = SequenceCounter::new();
        let ts = region("TS");

        assert_eq!(counter.current(&store, &ts, Epoch(2026)).unwrap(), 0);
        let (seq, _) = transact(&store, |tx| counter.next(tx, &ts, Epoch(2026))).unwrap();
        assert_eq!(seq, 1);
        assert_eq!(counter.current(&store, &ts, Epoch(2026)).unwrap(), 1);
    }

    #[test]
    fn test_counters_are_independent_per_region_and_epoch() {
        let store = authority();
        let counter = SequenceCounter::new();
        let (ts, ka) = (region("TS"), region("KA"));

        for _ in 0..3 {
            transact(&store, |tx| counter.next(tx, &ts, Epoch(2026))).unwrap();
        }
        let (ka_seq, _) = transact(&store, |tx| counter.next(tx, &ka, Epoch(2026))).unwrap();
        let (next_year, _) = transact(&store, |tx| counter.next(tx, &ts, Epoch(2027))).unwrap();

        assert_eq!(ka_seq, 1);
        assert_eq!(next_year, 1);
        assert_eq!(counter.current(&store, &ts, Epoch(2026)).unwrap(), 3);
    }

    #[test]
    fn test_aborted_transaction_does_not_consume_sequence() {
        let store = authority();
        let counter = SequenceCounter::new();
        let ts = region("TS");

        let aborted: Result<(u64, _), RegistryError> = transact(&store, |tx| {
            counter.next(tx, &ts, Epoch(2026))?;
            Err(RegistryError::invalid("identifier", "downstream write failed"))
        });
        assert!(aborted.is_err());

        let (seq, _) = transact(&store, |tx| counter.next(tx, &ts, Epoch(2026))).unwrap();
        assert_eq!(seq, 1);
    }

    #[test]
    fn test_exhaustion_is_fatal_and_leaves_counter() {
        let store = authority();
        let counter = SequenceCounter::with_config(SequenceConfig::with_ceiling(2));
        let ts = region("TS");

        transact(&store, |tx| counter.next(tx, &ts, Epoch(2026))).unwrap();
        transact(&store, |tx| counter.next(tx, &ts, Epoch(2026))).unwrap();
        let err = transact(&store, |tx| counter.next(tx, &ts, Epoch(2026))).unwrap_err();

        assert!(matches!(
            err,
            RegistryError::SequenceExhausted { ceiling: 2, epoch: 2026, .. }
        ));
        assert_eq!(counter.current(&store, &ts, Epoch(2026)).unwrap(), 2);
    }

    #[test]
    fn test_concurrent_allocations_are_gap_free() {
        let store = Arc::new(authority());
        let counter = SequenceCounter::new();
        let mut regions = vec!["TS"; 160];
        regions.extend(vec!["KA"; 40]);
        regions.shuffle(&mut rand::thread_rng());

        let handles: Vec<_> = regions
            .chunks(25)
            .map(|chunk| {
                let store = Arc::clone(&store);
                let counter = counter.clone();
                let chunk: Vec<&'static str> = chunk.to_vec();
                thread::spawn(move || {
                    chunk
                        .into_iter()
                        .map(|code| {
                            let r = region(code);
                            let (seq, _) =
                                transact(&*store, |tx| counter.next(tx, &r, Epoch(2026))).unwrap();
                            (code, seq)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ts_seen = BTreeSet::new();
        let mut ka_seen = BTreeSet::new();
        for handle in handles {
            for (code, seq) in handle.join().unwrap() {
                let fresh = if code == "TS" {
                    ts_seen.insert(seq)
                } else {
                    ka_seen.insert(seq)
                };
                assert!(fresh, "duplicate sequence {seq} for {code}");
            }
        }
        assert_eq!(ts_seen, (1..=160).collect::<BTreeSet<u64>>());
        assert_eq!(ka_seen, (1..=40).collect::<BTreeSet<u64>>());
    }
}
