//! Transaction validation for OCC
//!
//! Key rules:
//! - First-committer-wins based on READ-SET, not write-set
//! - Blind writes (write without read) do NOT conflict
//! - Keys observed by a range scan are part of the read set
//! - History reads are not validated
//! - Write skew is ALLOWED (do not try to prevent it)

use std::fmt;

use rustc_hash::FxHashMap;

use crate::transaction::TransactionContext;
use ledger_core::{Key, Result, Storage};

/// Conflicts that can occur during transaction validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Key was read at one version but its current version differs
    ReadWriteConflict {
        /// The key that has a conflict
        key: Key,
        /// Version recorded in read_set when read (0 = absent)
        read_version: u64,
        /// Current version in storage at validation time (0 = absent)
        current_version: u64,
    },
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictType::ReadWriteConflict {
                key,
                read_version,
                current_version,
            } => write!(
                f,
                "{} read at version {} but is now at version {}",
                key, read_version, current_version
            ),
        }
    }
}

/// Result of transaction validation
///
/// A transaction commits only if `is_valid()` returns true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        ValidationResult {
            conflicts: Vec::new(),
        }
    }

    /// Create a validation result with a single conflict
    pub fn conflict(conflict: ConflictType) -> Self {
        ValidationResult {
            conflicts: vec![conflict],
        }
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.conflicts.extend(other.conflicts);
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} conflict(s)", self.conflict_count())?;
        for (i, conflict) in self.conflicts.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { "; " })?;
            write!(f, "{}", conflict)?;
        }
        Ok(())
    }
}

/// Validate the read-set against current storage state
///
/// For each key in the read set, the latest committed version must still
/// equal the version observed when the key was read.
///
/// # Errors
///
/// A storage failure aborts validation; the transaction must not commit.
pub fn validate_read_set<S: Storage + ?Sized>(
    read_set: &FxHashMap<Key, u64>,
    store: &S,
) -> Result<ValidationResult> {
    let mut result = ValidationResult::ok();

    for (key, read_version) in read_set {
        let current_version = store
            .get(key)
            .map_err(|e| e.with_store_context("read-set validation failed"))?
            .map(|vv| vv.version.as_u64())
            .unwrap_or(0);

        if current_version != *read_version {
            result.conflicts.push(ConflictType::ReadWriteConflict {
                key: key.clone(),
                read_version: *read_version,
                current_version,
            });
        }
    }

    Ok(result)
}

/// Validate a whole transaction against current storage state
///
/// Read-only transactions always validate: they never write, so there is
/// nothing a stale read could corrupt.
pub fn validate_transaction<S: Storage + ?Sized>(
    txn: &TransactionContext,
    store: &S,
) -> Result<ValidationResult> {
    if txn.is_read_only() {
        return Ok(ValidationResult::ok());
    }
    validate_read_set(&txn.read_set, store)
}
