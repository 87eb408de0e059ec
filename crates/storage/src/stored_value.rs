//! Storage-layer version record
//!
//! The contract type `Versioned<T>` carries no transaction id and cannot
//! express a deletion. `StoredValue` is the storage form of one committed
//! version: the written bytes (or a tombstone) plus the full commit stamp.

use ledger_core::{CommitStamp, HistoryEntry, Version, Versioned, VersionedBytes};

/// One committed version of a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    /// Written bytes, `None` for a tombstone
    value: Option<Vec<u8>>,
    /// Commit that produced this version
    stamp: CommitStamp,
}

impl StoredValue {
    /// A live value written by `stamp`
    pub fn live(value: Vec<u8>, stamp: CommitStamp) -> Self {
        StoredValue {
            value: Some(value),
            stamp,
        }
    }

    /// A tombstone written by `stamp`
    pub fn tombstone(stamp: CommitStamp) -> Self {
        StoredValue { value: None, stamp }
    }

    /// Is this version a deletion?
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }

    /// Commit version
    #[inline]
    pub fn version(&self) -> Version {
        self.stamp.version
    }

    /// Commit stamp
    #[inline]
    pub fn stamp(&self) -> &CommitStamp {
        &self.stamp
    }

    /// Contract view of a live version, `None` for a tombstone
    pub fn versioned(&self) -> Option<VersionedBytes> {
        self.value
            .as_ref()
            .map(|v| Versioned::new(v.clone(), self.stamp.version, self.stamp.timestamp))
    }

    /// History form of this version
    pub fn to_history_entry(&self) -> HistoryEntry {
        match &self.value {
            Some(v) => HistoryEntry::write(
                self.stamp.tx_id.clone(),
                self.stamp.version,
                self.stamp.timestamp,
                v.clone(),
            ),
            None => HistoryEntry::tombstone(
                self.stamp.tx_id.clone(),
                self.stamp.version,
                self.stamp.timestamp,
            ),
        }
    }
}
