//! Per-key version chain
//!
//! Versions are kept oldest-first: commits only ever append, and history
//! scans yield in commit order without reversing.

use crate::stored_value::StoredValue;
use ledger_core::HistoryEntry;

/// Every committed version of one key
#[derive(Debug, Clone, Default)]
pub struct VersionChain {
    versions: Vec<StoredValue>,
}

impl VersionChain {
    /// Create a chain holding a single version
    pub fn new(value: StoredValue) -> Self {
        Self {
            versions: vec![value],
        }
    }

    /// Append a version; it must be newer than every version already present
    #[inline]
    pub fn push(&mut self, value: StoredValue) {
        debug_assert!(
            self.versions
                .last()
                .map_or(true, |last| last.version() < value.version()),
            "versions must be appended in commit order"
        );
        self.versions.push(value);
    }

    /// Newest version at or before `max_version`, tombstones included
    pub fn get_at_version(&self, max_version: u64) -> Option<&StoredValue> {
        self.versions
            .iter()
            .rev()
            .find(|sv| sv.version().as_u64() <= max_version)
    }

    /// Newest version
    #[inline]
    pub fn latest(&self) -> Option<&StoredValue> {
        self.versions.last()
    }

    /// Number of versions stored
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// History up to `max_version`, oldest first
    pub fn history(&self, max_version: u64) -> Vec<HistoryEntry> {
        self.versions
            .iter()
            .take_while(|sv| sv.version().as_u64() <= max_version)
            .map(StoredValue::to_history_entry)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{CommitStamp, Timestamp, TxId, Version};

    fn stamp(v: u64) -> CommitStamp {
        CommitStamp::new(Version::new(v), TxId::new(format!("tx{}", v)), Timestamp::from_secs(v))
    }

    #[test]
    fn test_get_at_version_picks_newest_visible() {
        let mut chain = VersionChain::new(StoredValue::live(b"a".to_vec(), stamp(1)));
        chain.push(StoredValue::live(b"b".to_vec(), stamp(5)));
        chain.push(StoredValue::tombstone(stamp(9)));

        assert!(chain.get_at_version(0).is_none());
        assert_eq!(chain.get_at_version(4).unwrap().version(), Version::new(1));
        assert_eq!(chain.get_at_version(8).unwrap().version(), Version::new(5));
        assert!(chain.get_at_version(9).unwrap().is_tombstone());
        assert!(chain.latest().unwrap().is_tombstone());
    }

    #[test]
    fn test_history_is_oldest_first_and_bounded() {
        let mut chain = VersionChain::new(StoredValue::live(b"a".to_vec(), stamp(2)));
        chain.push(StoredValue::live(b"b".to_vec(), stamp(3)));
        chain.push(StoredValue::tombstone(stamp(7)));

        let all = chain.history(u64::MAX);
        let txs: Vec<&str> = all.iter().map(|e| e.tx_id.as_str()).collect();
        assert_eq!(txs, vec!["tx2", "tx3", "tx7"]);
        assert!(all[2].is_delete);

        assert_eq!(chain.history(3).len(), 2);
        assert_eq!(chain.version_count(), 3);
    }
}
