//! Ledger struct and the transaction API
//!
//! The Ledger owns the versioned world state and the transaction coordinator.
//! It provides two ways to execute transactions:
//!
//! 1. **Closure API** (recommended): `ledger.transaction(|txn| { ... })`
//!    - Automatic commit on success, rollback on error
//!    - Returns the closure's return value
//!
//! 2. **Manual API**: `begin_transaction()` + `commit_transaction()`
//!    - For cases requiring external control over commit timing
//!
//! No retries happen here: a conflicting commit surfaces as
//! `LedgerError::Conflict` and the caller decides whether to resubmit.

use std::path::Path;
use std::sync::Arc;

use ledger_concurrency::TransactionContext;
use ledger_core::{Result, Storage};
use ledger_storage::UnifiedStore;
use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::coordinator::{TransactionCoordinator, TransactionMetrics};

/// In-process ledger with transaction support
///
/// # Example
///
/// ```text
/// let ledger = Ledger::new();
/// ledger.transaction(|txn| {
///     txn.put(Key::from("Event0"), bytes)?;
///     Ok(())
/// })?;
/// ```
pub struct Ledger {
    store: Arc<UnifiedStore>,
    coordinator: TransactionCoordinator,
    config: LedgerConfig,
}

impl Ledger {
    /// Create an empty ledger with default configuration
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create an empty ledger with the given configuration
    pub fn with_config(config: LedgerConfig) -> Self {
        Self::with_store(Arc::new(UnifiedStore::new()), config)
    }

    /// Create a ledger over an existing store
    ///
    /// The coordinator starts at the store's current version so new commits
    /// continue its version sequence.
    pub fn with_store(store: Arc<UnifiedStore>, config: LedgerConfig) -> Self {
        let coordinator = TransactionCoordinator::new(store.current_version());
        info!(
            target: "ledger::engine",
            contract = %config.contract_name,
            version = store.current_version(),
            "Ledger opened"
        );
        Self {
            store,
            coordinator,
            config,
        }
    }

    /// Create an empty ledger configured from a `ledger.toml` file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = LedgerConfig::from_file(path)?;
        Ok(Self::with_config(config))
    }

    /// Execute a closure within a transaction
    ///
    /// The closure's writes are committed atomically if it returns `Ok`;
    /// on `Err` the transaction is rolled back and the error returned as is.
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut TransactionContext) -> Result<T>,
    {
        self.transaction_with_version(f).map(|(value, _)| value)
    }

    /// Like `transaction()` but also returns the commit version
    ///
    /// Read-only transactions return the version they read at.
    pub fn transaction_with_version<F, T>(&self, f: F) -> Result<(T, u64)>
    where
        F: FnOnce(&mut TransactionContext) -> Result<T>,
    {
        let mut txn = self.begin_transaction();
        match f(&mut txn) {
            Ok(value) => {
                let version = self.commit_transaction(&mut txn)?;
                Ok((value, version))
            }
            Err(e) => {
                debug!(target: "ledger::engine", txn_id = txn.txn_id, error = %e, "Transaction body failed");
                self.coordinator.abort(&mut txn, e.to_string());
                Err(e)
            }
        }
    }

    /// Begin a new transaction (for manual control)
    ///
    /// The returned context must be passed to `commit_transaction()` or
    /// `abort_transaction()`.
    pub fn begin_transaction(&self) -> TransactionContext {
        self.coordinator.start_transaction(&self.store)
    }

    /// Commit a transaction, returning its commit version
    ///
    /// # Errors
    /// - `Conflict` - a key in the read set changed since it was read
    /// - `TransactionNotActive` - the transaction was already finished
    pub fn commit_transaction(&self, txn: &mut TransactionContext) -> Result<u64> {
        self.coordinator.commit(txn, self.store.as_ref())
    }

    /// Roll back a transaction started with `begin_transaction()`
    pub fn abort_transaction(&self, txn: &mut TransactionContext, reason: impl Into<String>) {
        self.coordinator.abort(txn, reason.into());
    }

    /// Highest committed version
    pub fn current_version(&self) -> u64 {
        self.store.current_version()
    }

    /// Underlying world state
    pub fn store(&self) -> &Arc<UnifiedStore> {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Transaction statistics since the ledger was opened
    pub fn metrics(&self) -> TransactionMetrics {
        self.coordinator.metrics()
    }

    /// Range and history cursors currently open against this ledger
    pub fn open_cursor_count(&self) -> usize {
        self.store.open_cursors()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{Key, LedgerError};

    #[test]
    fn test_transaction_commits_on_ok() {
        let ledger = Ledger::new();
        let (_, version) = ledger
            .transaction_with_version(|txn| txn.put(Key::from("k"), b"v".to_vec()))
            .unwrap();

        assert_eq!(version, 1);
        assert_eq!(ledger.current_version(), 1);
        assert_eq!(ledger.store().get(&Key::from("k")).unwrap().unwrap().value, b"v".to_vec());
    }

    #[test]
    fn test_transaction_rolls_back_on_err() {
        let ledger = Ledger::new();
        let err = ledger
            .transaction(|txn| {
                txn.put(Key::from("k"), b"v".to_vec())?;
                Err::<(), _>(LedgerError::not_found("Event9"))
            })
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(ledger.current_version(), 0);
        assert!(ledger.store().get(&Key::from("k")).unwrap().is_none());
        assert_eq!(ledger.metrics().total_aborted, 1);
    }

    #[test]
    fn test_manual_transaction_conflict() {
        let ledger = Ledger::new();
        ledger
            .transaction(|txn| txn.put(Key::from("k"), b"0".to_vec()))
            .unwrap();

        let mut first = ledger.begin_transaction();
        let mut second = ledger.begin_transaction();
        let _ = first.get(&Key::from("k")).unwrap();
        let _ = second.get(&Key::from("k")).unwrap();
        first.put(Key::from("k"), b"1".to_vec()).unwrap();
        second.put(Key::from("k"), b"2".to_vec()).unwrap();

        ledger.commit_transaction(&mut first).unwrap();
        assert!(ledger.commit_transaction(&mut second).unwrap_err().is_conflict());
        assert_eq!(ledger.store().get(&Key::from("k")).unwrap().unwrap().value, b"1".to_vec());
    }

    #[test]
    fn test_with_store_continues_version_sequence() {
        let first = Ledger::new();
        first
            .transaction(|txn| txn.put(Key::from("k"), b"v".to_vec()))
            .unwrap();

        let reopened = Ledger::with_store(Arc::clone(first.store()), LedgerConfig::default());
        let (_, version) = reopened
            .transaction_with_version(|txn| txn.put(Key::from("k"), b"w".to_vec()))
            .unwrap();
        assert_eq!(version, 2);
    }

    #[test]
    fn test_abort_transaction_is_counted() {
        let ledger = Ledger::new();
        let mut txn = ledger.begin_transaction();
        txn.put(Key::from("k"), b"v".to_vec()).unwrap();
        ledger.abort_transaction(&mut txn, "caller cancelled");

        assert!(txn.is_aborted());
        assert!(ledger.commit_transaction(&mut txn).is_err());
    }
}
