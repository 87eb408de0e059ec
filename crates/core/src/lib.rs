//! Core types and traits for the review event ledger
//!
//! This crate defines the foundational types used throughout the system:
//! - Key / KeyRange: ledger keys and ordered scan ranges (with an explicit full-scan sentinel)
//! - TxId: identifier of the transaction that committed a version
//! - Contract types: Timestamp, Version, Versioned<T>
//! - Cursor: closeable, scoped iterators returned by range and history scans
//! - Error: the ledger error taxonomy
//! - Traits: Storage, SnapshotView and the LedgerContext boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod cursor;
pub mod error;
pub mod history;
pub mod traits;
pub mod types;

pub use contract::{Timestamp, Version, Versioned, VersionedBytes};
pub use cursor::{Cursor, CursorLease, CursorRegistry};
pub use error::{LedgerError, Result};
pub use history::{CommitStamp, HistoryEntry};
pub use traits::{LedgerContext, SnapshotView, Storage};
pub use types::{Key, KeyRange, KeyValue, TxId};
