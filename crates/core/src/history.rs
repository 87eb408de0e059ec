//! Per-key modification history

use crate::contract::{Timestamp, Version};
use crate::types::TxId;

/// One committed modification of a key, as yielded by a history scan
///
/// History scans yield entries oldest to newest. A deletion is recorded
/// as a tombstone: `is_delete` is set and `value` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Transaction that committed this modification
    pub tx_id: TxId,
    /// Commit version
    pub version: Version,
    /// Commit time in the store's native form
    pub timestamp: Timestamp,
    /// Value written, empty for a tombstone
    pub value: Vec<u8>,
    /// Whether this modification deleted the key
    pub is_delete: bool,
}

impl HistoryEntry {
    /// Entry for a committed write
    pub fn write(tx_id: TxId, version: Version, timestamp: Timestamp, value: Vec<u8>) -> Self {
        HistoryEntry {
            tx_id,
            version,
            timestamp,
            value,
            is_delete: false,
        }
    }

    /// Entry for a committed delete
    pub fn tombstone(tx_id: TxId, version: Version, timestamp: Timestamp) -> Self {
        HistoryEntry {
            tx_id,
            version,
            timestamp,
            value: Vec::new(),
            is_delete: true,
        }
    }
}

/// Identity of a commit, stamped on every version it writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStamp {
    /// Commit version shared by all writes of the transaction
    pub version: Version,
    /// Committing transaction
    pub tx_id: TxId,
    /// Commit time
    pub timestamp: Timestamp,
}

impl CommitStamp {
    /// Create a commit stamp
    pub fn new(version: Version, tx_id: TxId, timestamp: Timestamp) -> Self {
        CommitStamp {
            version,
            tx_id,
            timestamp,
        }
    }
}
