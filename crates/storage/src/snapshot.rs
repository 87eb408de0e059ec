//! StoreSnapshot: lazy, version-bounded view of a UnifiedStore
//!
//! Because the store keeps every committed version, a snapshot is just a
//! version number plus a handle to the live store. Reads filter the version
//! chains, so writes committed after the snapshot was taken stay invisible.

use std::sync::Arc;

use ledger_core::{
    CursorRegistry, HistoryEntry, Key, KeyRange, Result, SnapshotView, Storage, VersionedBytes,
};

use crate::unified::UnifiedStore;

/// Point-in-time view of a [`UnifiedStore`]
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    version: u64,
    store: Arc<UnifiedStore>,
}

impl StoreSnapshot {
    /// Create a view of `store` at `version`
    ///
    /// Normally obtained through [`UnifiedStore::create_snapshot`].
    pub fn new(version: u64, store: Arc<UnifiedStore>) -> Self {
        Self { version, store }
    }
}

impl SnapshotView for StoreSnapshot {
    fn get(&self, key: &Key) -> Result<Option<VersionedBytes>> {
        self.store.get_versioned(key, self.version)
    }

    fn scan_range(&self, range: &KeyRange) -> Result<Vec<(Key, VersionedBytes)>> {
        self.store.scan_range(range, self.version)
    }

    fn history(&self, key: &Key) -> Result<Vec<HistoryEntry>> {
        self.store.get_history(key, self.version)
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn cursors(&self) -> CursorRegistry {
        self.store.cursors().clone()
    }
}
