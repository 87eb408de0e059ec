//! UnifiedStore: world state backend with BTreeMap and version management
//!
//! This module implements the Storage trait using:
//! - `BTreeMap<Key, VersionChain>` for ordered key storage with full history
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for the highest published commit version
//!
//! # Design Notes
//!
//! - **Full version history**: deletes append tombstones, nothing is removed
//! - **Publish after apply**: the global version moves only once a batch is
//!   fully written, so snapshots never see half a commit
//! - **Lazy snapshots**: snapshots filter the live chains by version instead
//!   of cloning the map

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use ledger_core::{
    CommitStamp, CursorRegistry, HistoryEntry, Key, KeyRange, Result, Storage, VersionedBytes,
};

use crate::snapshot::StoreSnapshot;
use crate::stored_value::StoredValue;
use crate::version_chain::VersionChain;

/// Unified storage backend using BTreeMap with RwLock
#[derive(Debug, Default)]
pub struct UnifiedStore {
    /// Ordered map from key to every committed version of that key
    data: RwLock<BTreeMap<Key, VersionChain>>,
    /// Highest commit version whose writes are fully visible
    version: AtomicU64,
    /// Open range/history cursors
    cursors: CursorRegistry,
}

impl UnifiedStore {
    /// Create a new empty store at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a version-bounded view at the current version
    ///
    /// The read lock is taken before the version is read so the snapshot
    /// can never name a version whose batch is still being applied.
    pub fn create_snapshot(self: &Arc<Self>) -> StoreSnapshot {
        let _guard = self.data.read();
        let version = self.current_version();
        StoreSnapshot::new(version, Arc::clone(self))
    }

    /// Number of keys that have ever been written (tombstoned keys included)
    pub fn key_count(&self) -> usize {
        self.data.read().len()
    }

    /// Number of cursors opened over this store and not yet released
    pub fn open_cursors(&self) -> usize {
        self.cursors.open_count()
    }

    fn publish(&self, version: u64) {
        self.version.fetch_max(version, Ordering::SeqCst);
    }

    fn append(data: &mut BTreeMap<Key, VersionChain>, key: Key, value: StoredValue) {
        match data.get_mut(&key) {
            Some(chain) => chain.push(value),
            None => {
                data.insert(key, VersionChain::new(value));
            }
        }
    }
}

impl Storage for UnifiedStore {
    fn get(&self, key: &Key) -> Result<Option<VersionedBytes>> {
        let data = self.data.read();
        Ok(data
            .get(key)
            .and_then(VersionChain::latest)
            .and_then(StoredValue::versioned))
    }

    fn get_versioned(&self, key: &Key, max_version: u64) -> Result<Option<VersionedBytes>> {
        let data = self.data.read();
        Ok(data
            .get(key)
            .and_then(|chain| chain.get_at_version(max_version))
            .and_then(StoredValue::versioned))
    }

    fn get_history(&self, key: &Key, max_version: u64) -> Result<Vec<HistoryEntry>> {
        let data = self.data.read();
        Ok(data
            .get(key)
            .map(|chain| chain.history(max_version))
            .unwrap_or_default())
    }

    fn scan_range(&self, range: &KeyRange, max_version: u64) -> Result<Vec<(Key, VersionedBytes)>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let data = self.data.read();
        let results: Vec<(Key, VersionedBytes)> = data
            .range::<Key, _>(range.bounds())
            .filter_map(|(k, chain)| {
                chain
                    .get_at_version(max_version)
                    .and_then(StoredValue::versioned)
                    .map(|vv| (k.clone(), vv))
            })
            .collect();
        Ok(results)
    }

    fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    fn put_with_version(&self, key: Key, value: Vec<u8>, stamp: &CommitStamp) -> Result<()> {
        let mut data = self.data.write();
        Self::append(&mut data, key, StoredValue::live(value, stamp.clone()));
        self.publish(stamp.version.as_u64());
        Ok(())
    }

    fn delete_with_version(&self, key: &Key, stamp: &CommitStamp) -> Result<Option<VersionedBytes>> {
        let mut data = self.data.write();
        let previous = data
            .get(key)
            .and_then(VersionChain::latest)
            .and_then(StoredValue::versioned);
        Self::append(&mut data, key.clone(), StoredValue::tombstone(stamp.clone()));
        self.publish(stamp.version.as_u64());
        Ok(previous)
    }

    fn apply_batch(
        &self,
        writes: Vec<(Key, Vec<u8>)>,
        deletes: Vec<Key>,
        stamp: &CommitStamp,
    ) -> Result<()> {
        let mut data = self.data.write();
        let (write_count, delete_count) = (writes.len(), deletes.len());

        for (key, value) in writes {
            Self::append(&mut data, key, StoredValue::live(value, stamp.clone()));
        }
        for key in deletes {
            Self::append(&mut data, key, StoredValue::tombstone(stamp.clone()));
        }

        self.publish(stamp.version.as_u64());
        trace!(
            target: "ledger::storage",
            version = stamp.version.as_u64(),
            writes = write_count,
            deletes = delete_count,
            "Applied commit batch"
        );
        Ok(())
    }

    fn cursors(&self) -> &CursorRegistry {
        &self.cursors
    }
}
