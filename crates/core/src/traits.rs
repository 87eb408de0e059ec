//! Core traits for storage, snapshots and the ledger boundary
//!
//! - [`Storage`]: the versioned, ordered key-value store (MVCC chains with tombstones)
//! - [`SnapshotView`]: a version-bounded read view of a `Storage`
//! - [`LedgerContext`]: the per-transaction capability handed to contract code
//!
//! Contract code only ever sees `LedgerContext`. Everything below it can be
//! swapped without touching the event repository.

use crate::contract::{Timestamp, VersionedBytes};
use crate::cursor::{Cursor, CursorRegistry};
use crate::error::Result;
use crate::history::{CommitStamp, HistoryEntry};
use crate::types::{Key, KeyRange, KeyValue, TxId};

/// Storage abstraction for the world state
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait Storage: Send + Sync {
    /// Get the latest live value for key
    ///
    /// Returns None if the key was never written or its latest version is a tombstone.
    fn get(&self, key: &Key) -> Result<Option<VersionedBytes>>;

    /// Get the live value at or before `max_version`
    fn get_versioned(&self, key: &Key, max_version: u64) -> Result<Option<VersionedBytes>>;

    /// Every committed modification of `key` up to `max_version`, oldest first
    ///
    /// Tombstones appear as entries with `is_delete` set.
    fn get_history(&self, key: &Key, max_version: u64) -> Result<Vec<HistoryEntry>>;

    /// Live entries inside `range` as of `max_version`, in key order
    fn scan_range(&self, range: &KeyRange, max_version: u64) -> Result<Vec<(Key, VersionedBytes)>>;

    /// Highest version committed so far
    fn current_version(&self) -> u64;

    /// Write `value` under the given commit stamp
    ///
    /// Used by transaction commit; does not allocate a version.
    fn put_with_version(&self, key: Key, value: Vec<u8>, stamp: &CommitStamp) -> Result<()>;

    /// Record a tombstone for `key` under the given commit stamp
    ///
    /// Returns the value that was live before the delete, if any.
    fn delete_with_version(&self, key: &Key, stamp: &CommitStamp) -> Result<Option<VersionedBytes>>;

    /// Apply a transaction's writes and deletes atomically under one stamp
    ///
    /// No snapshot may observe a partially applied batch.
    fn apply_batch(
        &self,
        writes: Vec<(Key, Vec<u8>)>,
        deletes: Vec<Key>,
        stamp: &CommitStamp,
    ) -> Result<()>;

    /// Registry tracking cursors opened over this store
    fn cursors(&self) -> &CursorRegistry;
}

/// Version-bounded read view of storage
///
/// Reads see exactly the versions committed at or before [`SnapshotView::version`].
pub trait SnapshotView: Send + Sync {
    /// Value as it existed at the snapshot version
    fn get(&self, key: &Key) -> Result<Option<VersionedBytes>>;

    /// Live entries inside `range` at the snapshot version, in key order
    fn scan_range(&self, range: &KeyRange) -> Result<Vec<(Key, VersionedBytes)>>;

    /// Modification history of `key` up to the snapshot version, oldest first
    fn history(&self, key: &Key) -> Result<Vec<HistoryEntry>>;

    /// Version this snapshot was taken at
    fn version(&self) -> u64;

    /// Registry tracking cursors opened over the underlying store
    fn cursors(&self) -> CursorRegistry;
}

/// Capability handed to contract code for the duration of one transaction
///
/// Every method acts inside the ambient transaction: reads observe a
/// consistent state, and writes become visible to others only if the
/// transaction commits. Scans return [`Cursor`]s that must be released
/// (closing or dropping them both count) before the operation returns.
pub trait LedgerContext {
    /// Identifier of the current transaction
    fn tx_id(&self) -> &TxId;

    /// Time the current transaction was proposed
    ///
    /// History entries carry the commit time instead.
    fn tx_timestamp(&self) -> Timestamp;

    /// Current bytes stored at `key`, `None` when absent
    fn get_state(&mut self, key: &Key) -> Result<Option<Vec<u8>>>;

    /// Store `value` at `key`
    fn put_state(&mut self, key: Key, value: Vec<u8>) -> Result<()>;

    /// Delete `key`, leaving a tombstone in its history
    fn del_state(&mut self, key: Key) -> Result<()>;

    /// Ordered scan over `range`
    ///
    /// The cursor is materialized from the transaction's snapshot when it
    /// is opened: every key in range has entered the read set by then, and
    /// only decoding by callers happens lazily.
    fn get_state_by_range(&mut self, range: &KeyRange) -> Result<Cursor<KeyValue>>;

    /// Committed modification history of `key`, oldest first
    fn get_history_for_key(&mut self, key: &Key) -> Result<Cursor<HistoryEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Version, Versioned};
    use std::collections::BTreeMap;

    /// Minimal in-memory context: one live value per key, no history.
    struct MapContext {
        tx_id: TxId,
        state: BTreeMap<Key, Vec<u8>>,
        cursors: CursorRegistry,
    }

    impl MapContext {
        fn new() -> Self {
            MapContext {
                tx_id: TxId::new("tx-1"),
                state: BTreeMap::new(),
                cursors: CursorRegistry::new(),
            }
        }
    }

    impl LedgerContext for MapContext {
        fn tx_id(&self) -> &TxId {
            &self.tx_id
        }

        fn tx_timestamp(&self) -> Timestamp {
            Timestamp::from_secs(1)
        }

        fn get_state(&mut self, key: &Key) -> Result<Option<Vec<u8>>> {
            Ok(self.state.get(key).cloned())
        }

        fn put_state(&mut self, key: Key, value: Vec<u8>) -> Result<()> {
            self.state.insert(key, value);
            Ok(())
        }

        fn del_state(&mut self, key: Key) -> Result<()> {
            self.state.remove(&key);
            Ok(())
        }

        fn get_state_by_range(&mut self, range: &KeyRange) -> Result<Cursor<KeyValue>> {
            let items: Vec<KeyValue> = self
                .state
                .iter()
                .filter(|(k, _)| range.contains(k))
                .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
                .collect();
            Ok(Cursor::from_items(items).with_lease(self.cursors.acquire()))
        }

        fn get_history_for_key(&mut self, key: &Key) -> Result<Cursor<HistoryEntry>> {
            let entries = self
                .state
                .get(key)
                .map(|v| {
                    vec![HistoryEntry::write(
                        self.tx_id.clone(),
                        Version::new(1),
                        Timestamp::EPOCH,
                        v.clone(),
                    )]
                })
                .unwrap_or_default();
            Ok(Cursor::from_items(entries).with_lease(self.cursors.acquire()))
        }
    }

    #[test]
    fn test_ledger_context_is_object_safe() {
        let mut ctx = MapContext::new();
        let dyn_ctx: &mut dyn LedgerContext = &mut ctx;
        dyn_ctx.put_state(Key::from("a"), b"1".to_vec()).unwrap();
        assert_eq!(dyn_ctx.get_state(&Key::from("a")).unwrap(), Some(b"1".to_vec()));
        assert_eq!(dyn_ctx.tx_id().as_str(), "tx-1");
    }

    #[test]
    fn test_range_cursor_through_trait() {
        let mut ctx = MapContext::new();
        for k in ["a", "b", "c"] {
            ctx.put_state(Key::from(k), k.as_bytes().to_vec()).unwrap();
        }
        let keys: Vec<String> = ctx
            .get_state_by_range(&KeyRange::between("a", "c"))
            .unwrap()
            .map(|kv| kv.unwrap().key.into_string())
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(ctx.cursors.open_count(), 0);
    }

    #[test]
    fn test_del_state_removes_value() {
        let mut ctx = MapContext::new();
        ctx.put_state(Key::from("a"), b"1".to_vec()).unwrap();
        ctx.del_state(Key::from("a")).unwrap();
        assert_eq!(ctx.get_state(&Key::from("a")).unwrap(), None);
    }

    #[test]
    fn test_storage_traits_are_object_safe() {
        fn _assert_storage(_: &dyn Storage) {}
        fn _assert_snapshot(_: &dyn SnapshotView) {}
        fn _assert_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_send_sync::<dyn Storage>();
        _assert_send_sync::<dyn SnapshotView>();
        let _ = Versioned::new(Vec::<u8>::new(), Version::ZERO, Timestamp::EPOCH);
    }
}
