//! Transaction coordinator for managing transaction lifecycle
//!
//! The TransactionCoordinator wraps TransactionManager and adds:
//! - Snapshot acquisition for new transactions
//! - Transaction metrics (started, committed, aborted)
//! - Conversion of commit failures into `LedgerError`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ledger_concurrency::{TransactionContext, TransactionManager};
use ledger_core::{LedgerError, Result, Storage};
use ledger_storage::UnifiedStore;
use tracing::{debug, warn};

/// Transaction coordinator for the ledger
///
/// The metric counters use Relaxed ordering: they are observational only and
/// synchronize nothing else.
pub struct TransactionCoordinator {
    manager: TransactionManager,
    active_count: AtomicU64,
    total_started: AtomicU64,
    total_committed: AtomicU64,
    total_aborted: AtomicU64,
}

impl TransactionCoordinator {
    /// Create new coordinator with initial version
    ///
    /// `initial_version` must match the store the coordinator commits to.
    pub fn new(initial_version: u64) -> Self {
        Self {
            manager: TransactionManager::new(initial_version),
            active_count: AtomicU64::new(0),
            total_started: AtomicU64::new(0),
            total_committed: AtomicU64::new(0),
            total_aborted: AtomicU64::new(0),
        }
    }

    /// Start a new transaction over a snapshot of `storage`
    pub fn start_transaction(&self, storage: &Arc<UnifiedStore>) -> TransactionContext {
        let txn_id = self.manager.next_txn_id();
        let snapshot = storage.create_snapshot();

        self.active_count.fetch_add(1, Ordering::Relaxed);
        self.total_started.fetch_add(1, Ordering::Relaxed);

        let txn = TransactionContext::with_snapshot(txn_id, Box::new(snapshot));
        debug!(
            target: "ledger::txn",
            txn_id,
            tx_id = %txn.tx_id(),
            start_version = txn.start_version,
            "Transaction started"
        );
        txn
    }

    /// Commit a transaction through the concurrency layer
    ///
    /// On failure the transaction is left aborted and the error is converted:
    /// validation conflicts become `LedgerError::Conflict`.
    pub fn commit<S: Storage + ?Sized>(&self, txn: &mut TransactionContext, store: &S) -> Result<u64> {
        match self.manager.commit_or_rollback(txn, store) {
            Ok(version) => {
                self.record_commit();
                debug!(
                    target: "ledger::txn",
                    txn_id = txn.txn_id,
                    tx_id = %txn.tx_id(),
                    commit_version = version,
                    writes = txn.write_count(),
                    "Transaction committed"
                );
                Ok(version)
            }
            Err(e) => {
                self.record_abort();
                warn!(target: "ledger::txn", txn_id = txn.txn_id, error = %e, "Transaction aborted");
                Err(LedgerError::from(e))
            }
        }
    }

    /// Abort a transaction whose body failed
    pub fn abort(&self, txn: &mut TransactionContext, reason: String) {
        if txn.can_rollback() {
            let _ = self.manager.abort(txn, reason);
        }
        self.record_abort();
        debug!(target: "ledger::txn", txn_id = txn.txn_id, "Transaction rolled back");
    }

    /// Record transaction commit
    pub fn record_commit(&self) {
        let _ = self
            .active_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |x| {
                Some(x.saturating_sub(1))
            });
        self.total_committed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record transaction abort
    pub fn record_abort(&self) {
        let _ = self
            .active_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |x| {
                Some(x.saturating_sub(1))
            });
        self.total_aborted.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current global version
    pub fn current_version(&self) -> u64 {
        self.manager.current_version()
    }

    /// Get transaction metrics
    pub fn metrics(&self) -> TransactionMetrics {
        let started = self.total_started.load(Ordering::Relaxed);
        let committed = self.total_committed.load(Ordering::Relaxed);

        TransactionMetrics {
            active_count: self.active_count.load(Ordering::Relaxed),
            total_started: started,
            total_committed: committed,
            total_aborted: self.total_aborted.load(Ordering::Relaxed),
            commit_rate: if started > 0 {
                committed as f64 / started as f64
            } else {
                0.0
            },
        }
    }
}

/// Transaction metrics
#[derive(Debug, Clone)]
pub struct TransactionMetrics {
    /// Number of currently active transactions
    pub active_count: u64,
    /// Total number of transactions started
    pub total_started: u64,
    /// Total number of transactions committed
    pub total_committed: u64,
    /// Total number of transactions aborted
    pub total_aborted: u64,
    /// Commit success rate (committed / started)
    pub commit_rate: f64,
}

impl TransactionMetrics {
    /// Total transactions that completed (committed + aborted)
    pub fn total_completed(&self) -> u64 {
        self.total_committed + self.total_aborted
    }

    /// Abort rate (aborted / started)
    pub fn abort_rate(&self) -> f64 {
        if self.total_started > 0 {
            self.total_aborted as f64 / self.total_started as f64
        } else {
            0.0
        }
    }
}
