//! JSON record helpers.
//!
//! Records are stored as `serde_json` bytes; field order follows the struct
//! declaration, so values are byte-stable across writers.

use crate::errors::StoreError;
use crate::ports::{LedgerStore, LedgerTransaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::RegistryError;

/// Decode stored bytes.
pub fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, RegistryError> {
    serde_json::from_slice(bytes).map_err(|e| {
        StoreError::Codec {
            key: key.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Read and decode a record inside a transaction.
pub fn read_record<T: DeserializeOwned>(
    tx: &dyn LedgerTransaction,
    key: &str,
) -> Result<Option<T>, RegistryError> {
    tx.get(key)?.map(|bytes| decode(key, &bytes)).transpose()
}

/// Encode and stage a record inside a transaction.
pub fn write_record<T: Serialize>(
    tx: &mut dyn LedgerTransaction,
    key: &str,
    record: &T,
) -> Result<(), RegistryError> {
    let bytes = serde_json::to_vec(record).map_err(|e| StoreError::Codec {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    tx.put(key, bytes)?;
    Ok(())
}

/// Read and decode a committed record.
pub fn load<T: DeserializeOwned>(
    store: &dyn LedgerStore,
    key: &str,
) -> Result<Option<T>, RegistryError> {
    store.get(key)?.map(|bytes| decode(key, &bytes)).transpose()
}

/// Decode every committed record under `prefix`, in key order.
pub fn scan<T: DeserializeOwned>(
    store: &dyn LedgerStore,
    prefix: &str,
) -> Result<Vec<(String, T)>, RegistryError> {
    store
        .scan_prefix(prefix)?
        .into_iter()
        .map(|(key, bytes)| {
            let record = decode(&key, &bytes)?;
            Ok((key, record))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedger;
    use crate::ports::transact;
    use serde::Deserialize;
    use shared_types::PartitionId;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Counter {
        region: String,
        epoch: u32,
        sequence: u64,
    }

    #[test]
    fn test_write_then_read_in_same_tx() {
        let store = InMemoryLedger::new(PartitionId::authority());
        let (seen, _) = transact(&store, |tx| {
            write_record(
                tx,
                "COUNTER_TS_2026",
                &Counter {
                    region: "TS".into(),
                    epoch: 2026,
                    sequence: 1,
                },
            )?;
            read_record::<Counter>(tx, "COUNTER_TS_2026")
        })
        .unwrap();
        assert_eq!(seen.map(|c| c.sequence), Some(1));
    }

    #[test]
    fn test_stored_bytes_are_stable_json() {
        let store = InMemoryLedger::new(PartitionId::authority());
        transact(&store, |tx| {
            write_record(
                tx,
                "COUNTER_TS_2026",
                &Counter {
                    region: "TS".into(),
                    epoch: 2026,
                    sequence: 3,
                },
            )
        })
        .unwrap();
        let raw = store.get("COUNTER_TS_2026").unwrap().unwrap();
        assert_eq!(
            String::from_utf8(raw).unwrap(),
            r#"{"region":"TS","epoch":2026,"sequence":3}"#
        );
    }

    #[test]
    fn test_decode_failure_is_storage_error() {
        let store = InMemoryLedger::new(PartitionId::authority());
        transact(&store, |tx| {
            tx.put("bad", b"not json".to_vec())?;
            Ok(())
        })
        .unwrap();
        let err = load::<Counter>(&store, "bad").unwrap_err();
        assert!(matches!(err, RegistryError::Storage { key, .. } if key == "bad"));
    }

    #[test]
    fn test_scan_decodes_in_key_order() {
        let store = InMemoryLedger::new(PartitionId::authority());
        transact(&store, |tx| {
            for (region, seq) in [("KA", 2), ("TS", 5)] {
                write_record(
                    tx,
                    &format!("COUNTER_{region}_2026"),
                    &Counter {
                        region: region.into(),
                        epoch: 2026,
                        sequence: seq,
                    },
                )?;
            }
            Ok(())
        })
        .unwrap();
        let all: Vec<(String, Counter)> = scan(&store, "COUNTER_").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].1.region, "KA");
        assert_eq!(all[1].1.sequence, 5);
    }
}
