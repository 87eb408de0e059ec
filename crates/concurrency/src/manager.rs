//! Transaction manager for coordinating commit operations
//!
//! Provides atomic commit by orchestrating:
//! 1. Validation (first-committer-wins)
//! 2. Version allocation
//! 3. Storage application (visibility)
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. acquire commit lock
//! 2. txn.commit(store)      - Active → Validating → Committed | Aborted
//! 3. IF read-only: done, no version is consumed
//! 4. allocate commit_version and commit timestamp
//! 5. txn.apply_writes()     - one batch, one stamp, published atomically
//! 6. release commit lock, return commit_version
//! ```
//!
//! Validation and application happen under the same lock, so no other
//! transaction can commit between a successful validation and its writes.
//!
//! The commit timestamp is read under the lock and never goes below the
//! previous commit's, so history timestamps follow commit order even when
//! transactions commit in a different order than they began.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::error;

use crate::{CommitError, TransactionContext, TransactionStatus};
use ledger_core::{CommitStamp, Result, Storage, Timestamp, Version};

/// Manages transaction lifecycle and atomic commits
pub struct TransactionManager {
    /// Global version counter; each committing write transaction takes the next value
    version: AtomicU64,
    /// Next local transaction number
    next_txn_id: AtomicU64,
    /// Serializes validate-and-apply; guards the last commit timestamp
    commit_lock: Mutex<Timestamp>,
}

impl TransactionManager {
    /// Create a new transaction manager starting at `initial_version`
    ///
    /// `initial_version` must be the store's current version.
    pub fn new(initial_version: u64) -> Self {
        TransactionManager {
            version: AtomicU64::new(initial_version),
            next_txn_id: AtomicU64::new(1),
            commit_lock: Mutex::new(Timestamp::EPOCH),
        }
    }

    /// Get current global version
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Allocate next transaction number
    pub fn next_txn_id(&self) -> u64 {
        self.next_txn_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Allocate next commit version
    pub fn allocate_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit a transaction atomically
    ///
    /// Writes are stamped with the commit time, not the transaction's
    /// begin time (`TransactionContext::timestamp`).
    ///
    /// # Returns
    /// - Ok(commit_version) on success; read-only transactions return the
    ///   version they read at
    /// - Err(CommitError) if validation fails or storage rejects the writes
    pub fn commit<S: Storage + ?Sized>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
    ) -> std::result::Result<u64, CommitError> {
        let mut last_commit = self.commit_lock.lock();

        txn.commit(store)?;

        if txn.is_read_only() {
            return Ok(txn.start_version);
        }

        let commit_version = self.allocate_version();
        let committed_at = Timestamp::now().max(*last_commit);
        let stamp = CommitStamp::new(Version::new(commit_version), txn.tx_id().clone(), committed_at);

        if let Err(e) = txn.apply_writes(store, &stamp) {
            error!(
                target: "ledger::concurrency",
                txn_id = txn.txn_id,
                commit_version,
                error = %e,
                "Storage application failed; transaction rolled back"
            );
            txn.status = TransactionStatus::Aborted {
                reason: format!("storage application failed: {}", e),
            };
            return Err(CommitError::Storage(e));
        }

        *last_commit = committed_at;
        Ok(commit_version)
    }

    /// Explicitly abort a transaction
    pub fn abort(&self, txn: &mut TransactionContext, reason: String) -> Result<()> {
        txn.mark_aborted(reason)
    }

    /// Commit, making sure the transaction ends up aborted on any failure
    pub fn commit_or_rollback<S: Storage + ?Sized>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
    ) -> std::result::Result<u64, CommitError> {
        match self.commit(txn, store) {
            Ok(version) => Ok(version),
            Err(e) => {
                if txn.can_rollback() {
                    let _ = txn.mark_aborted(format!("commit failed: {}", e));
                }
                Err(e)
            }
        }
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new(0)
    }
}
