//! Transaction context for OCC
//!
//! This module implements the core transaction data structure for optimistic
//! concurrency control. TransactionContext tracks all reads, writes and
//! deletes of a transaction, enabling validation at commit time.
//!
//! It is also the ledger's [`LedgerContext`]: contract code receives a
//! `&mut TransactionContext` and never sees the store directly.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::validation::{validate_transaction, ValidationResult};
use ledger_core::{
    CommitStamp, Cursor, HistoryEntry, Key, KeyRange, KeyValue, LedgerContext, LedgerError,
    Result, SnapshotView, Storage, Timestamp, TxId,
};

/// Error type for commit failures
///
/// - All-or-nothing commit: transaction either commits or aborts entirely
/// - First-committer-wins: conflicts are detected based on read-set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    /// Transaction aborted due to validation conflicts
    #[error("commit failed: {0}")]
    ValidationFailed(ValidationResult),

    /// Transaction was not in correct state for commit
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Storage failed while validating or applying the transaction
    #[error("storage failure during commit: {0}")]
    Storage(LedgerError),
}

impl From<CommitError> for LedgerError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::ValidationFailed(result) => LedgerError::conflict(result.to_string()),
            CommitError::InvalidState(state) => LedgerError::TransactionNotActive { state },
            CommitError::Storage(err) => err,
        }
    }
}

/// Result of applying transaction writes to storage
///
/// All keys in a transaction get the same commit version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    /// Version assigned to all writes in this transaction
    pub commit_version: u64,
    /// Number of puts applied
    pub puts_applied: usize,
    /// Number of deletes applied
    pub deletes_applied: usize,
}

impl ApplyResult {
    /// Total number of operations applied
    pub fn total_operations(&self) -> usize {
        self.puts_applied + self.deletes_applied
    }
}

/// Summary of pending operations that would be discarded on abort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperations {
    /// Number of pending put operations
    pub puts: usize,
    /// Number of pending delete operations
    pub deletes: usize,
}

impl PendingOperations {
    /// Total number of pending operations
    pub fn total(&self) -> usize {
        self.puts + self.deletes
    }

    /// Check if there are no pending operations
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Status of a transaction in its lifecycle
///
/// State transitions:
/// - `Active` → `Validating` (begin commit)
/// - `Validating` → `Committed` (validation passed)
/// - `Validating` → `Aborted` (conflict detected)
/// - `Active` → `Aborted` (contract error or explicit abort)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction is executing, can read/write
    Active,
    /// Transaction is being validated for conflicts
    Validating,
    /// Transaction committed successfully
    Committed,
    /// Transaction was aborted
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
}

/// Transaction context for OCC with snapshot isolation
///
/// # Read-Your-Writes Semantics
///
/// When reading a key, the transaction checks in order:
/// 1. **write_set**: Returns uncommitted write from this transaction
/// 2. **delete_set**: Returns None for uncommitted delete
/// 3. **snapshot**: Returns value from snapshot, tracks in read_set
///
/// History scans only ever see committed versions.
///
/// # Lifecycle
///
/// 1. **BEGIN**: Create with `with_snapshot()`, status is `Active`
/// 2. **READ/WRITE**: `get()`, `scan_range()`, `put()`, `delete()`
/// 3. **COMMIT/ABORT**: `commit()` + `apply_writes()`, or `mark_aborted()`
pub struct TransactionContext {
    /// Sequential transaction number, local to this process
    pub txn_id: u64,
    /// Identifier recorded in key history for every version this transaction commits
    tx_id: TxId,
    /// Time the transaction began; commits stamp their own time
    timestamp: Timestamp,

    /// Version at transaction start (snapshot version)
    pub start_version: u64,
    snapshot: Option<Box<dyn SnapshotView>>,

    /// Keys read and their versions (for validation)
    ///
    /// Version 0 means the key did not exist when read.
    pub read_set: FxHashMap<Key, u64>,
    /// Keys written with their new values (buffered until commit)
    pub write_set: BTreeMap<Key, Vec<u8>>,
    /// Keys to delete (buffered until commit)
    pub delete_set: BTreeSet<Key>,

    /// Current transaction status
    pub status: TransactionStatus,
    start_time: Instant,
}

impl TransactionContext {
    /// Create a transaction context without a snapshot
    ///
    /// Such a transaction can only write; reads fail.
    pub fn new(txn_id: u64, start_version: u64) -> Self {
        TransactionContext {
            txn_id,
            tx_id: TxId::generate(),
            timestamp: Timestamp::now(),
            start_version,
            snapshot: None,
            read_set: FxHashMap::default(),
            write_set: BTreeMap::new(),
            delete_set: BTreeSet::new(),
            status: TransactionStatus::Active,
            start_time: Instant::now(),
        }
    }

    /// Create a transaction context reading from `snapshot`
    pub fn with_snapshot(txn_id: u64, snapshot: Box<dyn SnapshotView>) -> Self {
        let mut txn = Self::new(txn_id, snapshot.version());
        txn.snapshot = Some(snapshot);
        txn
    }

    /// Override the transaction timestamp
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Transaction identifier recorded in history
    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// Time the transaction began
    ///
    /// This is the proposal time exposed as `tx_timestamp()`. History
    /// records the commit time chosen by `TransactionManager::commit`.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    // === Read Operations ===

    /// Get a value from the transaction
    ///
    /// Implements read-your-writes semantics; only snapshot reads enter the read set.
    pub fn get(&mut self, key: &Key) -> Result<Option<Vec<u8>>> {
        self.ensure_active()?;

        if let Some(value) = self.write_set.get(key) {
            return Ok(Some(value.clone()));
        }
        if self.delete_set.contains(key) {
            return Ok(None);
        }

        let versioned = self.snapshot()?.get(key)?;
        match versioned {
            Some(vv) => {
                self.read_set.insert(key.clone(), vv.version.as_u64());
                Ok(Some(vv.value))
            }
            None => {
                // Absent keys are tracked too: a concurrent create is a conflict
                self.read_set.insert(key.clone(), 0);
                Ok(None)
            }
        }
    }

    /// Scan a key range
    ///
    /// Merges snapshot entries with this transaction's pending writes and
    /// deletes. Every snapshot entry returned is tracked in the read set.
    /// Results are sorted by key order.
    pub fn scan_range(&mut self, range: &KeyRange) -> Result<Vec<(Key, Vec<u8>)>> {
        self.ensure_active()?;

        let snapshot_results = self.snapshot()?.scan_range(range)?;
        let mut results: BTreeMap<Key, Vec<u8>> = BTreeMap::new();

        for (key, vv) in snapshot_results {
            if !self.delete_set.contains(&key) {
                self.read_set.insert(key.clone(), vv.version.as_u64());
                results.insert(key, vv.value);
            }
        }

        for (key, value) in &self.write_set {
            if range.contains(key) {
                results.insert(key.clone(), value.clone());
            }
        }

        Ok(results.into_iter().collect())
    }

    /// Committed history of `key` as of the snapshot, oldest first
    pub fn history(&self, key: &Key) -> Result<Vec<HistoryEntry>> {
        self.ensure_active()?;
        self.snapshot()?.history(key)
    }

    /// Get the version that was read for a key (from read_set)
    pub fn get_read_version(&self, key: &Key) -> Option<u64> {
        self.read_set.get(key).copied()
    }

    fn snapshot(&self) -> Result<&dyn SnapshotView> {
        self.snapshot
            .as_deref()
            .ok_or_else(|| LedgerError::invalid_input("transaction has no snapshot for reads"))
    }

    // === Write Operations ===

    /// Buffer a write; it becomes visible to others only on commit
    pub fn put(&mut self, key: Key, value: Vec<u8>) -> Result<()> {
        self.ensure_active()?;
        self.delete_set.remove(&key);
        self.write_set.insert(key, value);
        Ok(())
    }

    /// Buffer a delete; at commit it becomes a tombstone
    pub fn delete(&mut self, key: Key) -> Result<()> {
        self.ensure_active()?;
        self.write_set.remove(&key);
        self.delete_set.insert(key);
        Ok(())
    }

    // === State ===

    /// Check if transaction is active
    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    /// Check if transaction committed
    pub fn is_committed(&self) -> bool {
        self.status == TransactionStatus::Committed
    }

    /// Check if transaction aborted
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, TransactionStatus::Aborted { .. })
    }

    /// Check if the transaction can still be rolled back
    pub fn can_rollback(&self) -> bool {
        matches!(
            self.status,
            TransactionStatus::Active | TransactionStatus::Validating
        )
    }

    /// Time since the transaction began
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Check if transaction can accept operations
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(LedgerError::TransactionNotActive {
                state: format!("transaction {} is {:?}", self.txn_id, self.status),
            })
        }
    }

    /// Abort the transaction, discarding buffered writes
    ///
    /// The read set is kept for diagnostics.
    pub fn mark_aborted(&mut self, reason: String) -> Result<()> {
        match &self.status {
            TransactionStatus::Committed | TransactionStatus::Aborted { .. } => {
                Err(LedgerError::TransactionNotActive {
                    state: format!(
                        "cannot abort transaction {} from {:?}",
                        self.txn_id, self.status
                    ),
                })
            }
            _ => {
                self.status = TransactionStatus::Aborted { reason };
                self.write_set.clear();
                self.delete_set.clear();
                Ok(())
            }
        }
    }

    /// Buffered operations that commit would apply
    pub fn pending_operations(&self) -> PendingOperations {
        PendingOperations {
            puts: self.write_set.len(),
            deletes: self.delete_set.len(),
        }
    }

    // === Commit Operation ===

    /// Validate the transaction against current storage
    ///
    /// `Active` → `Validating` → `Committed`, or → `Aborted` on conflict.
    /// Writes are applied separately by [`TransactionContext::apply_writes`].
    pub fn commit<S: Storage + ?Sized>(&mut self, store: &S) -> std::result::Result<(), CommitError> {
        if !self.is_active() {
            return Err(CommitError::InvalidState(format!(
                "cannot commit transaction {} from {:?} state",
                self.txn_id, self.status
            )));
        }
        self.status = TransactionStatus::Validating;

        let validation_result = match validate_transaction(self, store) {
            Ok(result) => result,
            Err(e) => {
                self.status = TransactionStatus::Aborted {
                    reason: format!("validation could not complete: {}", e),
                };
                return Err(CommitError::Storage(e));
            }
        };

        if !validation_result.is_valid() {
            self.status = TransactionStatus::Aborted {
                reason: format!(
                    "commit failed: {} conflict(s) detected",
                    validation_result.conflict_count()
                ),
            };
            return Err(CommitError::ValidationFailed(validation_result));
        }

        self.status = TransactionStatus::Committed;
        Ok(())
    }

    /// Apply all buffered writes to storage under one commit stamp
    ///
    /// # Errors
    /// Fails if the transaction is not `Committed` or storage rejects the batch.
    pub fn apply_writes<S: Storage + ?Sized>(&self, store: &S, stamp: &CommitStamp) -> Result<ApplyResult> {
        if !self.is_committed() {
            return Err(LedgerError::TransactionNotActive {
                state: format!(
                    "cannot apply writes: transaction {} is {:?}",
                    self.txn_id, self.status
                ),
            });
        }

        let writes: Vec<(Key, Vec<u8>)> = self
            .write_set
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let deletes: Vec<Key> = self.delete_set.iter().cloned().collect();
        let result = ApplyResult {
            commit_version: stamp.version.as_u64(),
            puts_applied: writes.len(),
            deletes_applied: deletes.len(),
        };

        store.apply_batch(writes, deletes, stamp)?;
        Ok(result)
    }

    // === Introspection ===

    /// Number of keys in the read set
    pub fn read_count(&self) -> usize {
        self.read_set.len()
    }

    /// Number of keys in the write set
    pub fn write_count(&self) -> usize {
        self.write_set.len()
    }

    /// Number of keys in the delete set
    pub fn delete_count(&self) -> usize {
        self.delete_set.len()
    }

    /// True when the transaction buffered no writes or deletes
    pub fn is_read_only(&self) -> bool {
        self.write_set.is_empty() && self.delete_set.is_empty()
    }

    /// Abort reason, if aborted
    pub fn abort_reason(&self) -> Option<&str> {
        match &self.status {
            TransactionStatus::Aborted { reason } => Some(reason),
            _ => None,
        }
    }
}

impl LedgerContext for TransactionContext {
    fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn get_state(&mut self, key: &Key) -> Result<Option<Vec<u8>>> {
        self.get(key)
    }

    fn put_state(&mut self, key: Key, value: Vec<u8>) -> Result<()> {
        self.put(key, value)
    }

    fn del_state(&mut self, key: Key) -> Result<()> {
        self.delete(key)
    }

    fn get_state_by_range(&mut self, range: &KeyRange) -> Result<Cursor<KeyValue>> {
        // Scanned eagerly so the whole range is validated at commit.
        let entries = self.scan_range(range)?;
        let lease = self.snapshot()?.cursors().acquire();
        let items: Vec<KeyValue> = entries
            .into_iter()
            .map(|(key, value)| KeyValue { key, value })
            .collect();
        Ok(Cursor::from_items(items).with_lease(lease))
    }

    fn get_history_for_key(&mut self, key: &Key) -> Result<Cursor<HistoryEntry>> {
        let entries = self.history(key)?;
        let lease = self.snapshot()?.cursors().acquire();
        Ok(Cursor::from_items(entries).with_lease(lease))
    }
}

impl std::fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("txn_id", &self.txn_id)
            .field("tx_id", &self.tx_id)
            .field("start_version", &self.start_version)
            .field("status", &self.status)
            .field("reads", &self.read_set.len())
            .field("writes", &self.write_set.len())
            .field("deletes", &self.delete_set.len())
            .finish()
    }
}
