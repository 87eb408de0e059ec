//! Concurrency layer for the review event ledger
//!
//! This crate implements optimistic concurrency control (OCC) with:
//! - TransactionContext: read/write set tracking, and the `LedgerContext`
//!   capability that contract code runs against
//! - Snapshot isolation through version-bounded snapshot views
//! - Conflict detection at commit time (first-committer-wins on the read set)
//! - TransactionManager: serialized validate-and-apply under a commit lock
//!
//! A read-modify-write that raced with another committed write to the same
//! key fails with a conflict instead of silently losing the other update.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod transaction;
pub mod validation;

pub use manager::TransactionManager;
pub use transaction::{ApplyResult, CommitError, PendingOperations, TransactionContext, TransactionStatus};
pub use validation::{validate_read_set, validate_transaction, ConflictType, ValidationResult};
