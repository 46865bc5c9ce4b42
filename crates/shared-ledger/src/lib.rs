//! # Shared Ledger
//!
//! The partitioned ledger every registry service runs against.
//!
//! ## Contract
//!
//! | Guarantee | Provided by |
//! |-----------|-------------|
//! | Serializable per-partition transactions | [`LedgerStore::begin`] |
//! | Read-your-writes inside a transaction | [`LedgerTransaction::get`] |
//! | Ordered range scan | [`LedgerStore::scan_prefix`] |
//! | Per-key change history | [`LedgerStore::history`] |
//! | Events released only on commit | [`TxReceipt`] |
//!
//! A transaction dropped without [`LedgerTransaction::commit`] leaves no
//! trace. Nothing is shared between partitions.
//!
//! ## Module Structure
//!
//! ```text
//! shared-ledger/
//! ├── ports.rs     # LedgerStore / LedgerTransaction traits, receipts
//! ├── errors.rs    # StoreError
//! ├── codec.rs     # JSON record helpers
//! └── memory.rs    # InMemoryLedger adapter
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod errors;
pub mod memory;
pub mod ports;

pub use codec::{decode, load, read_record, scan, write_record};
pub use errors::StoreError;
pub use memory::InMemoryLedger;
pub use ports::{publish_receipt, transact, HistoryEntry, LedgerStore, LedgerTransaction, TxReceipt};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
