//! Storage layer for the review event ledger
//!
//! This crate implements the world state behind the ledger boundary:
//! - UnifiedStore: BTreeMap of per-key version chains behind a parking_lot RwLock
//! - VersionChain: every committed version of a key, tombstones included
//! - StoreSnapshot: lazy, version-bounded view used for transaction isolation
//! - Version management with AtomicU64
//!
//! Keeping full chains is what makes per-key history scans possible.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod snapshot;
pub mod stored_value;
pub mod unified;
pub mod version_chain;

pub use snapshot::StoreSnapshot;
pub use stored_value::StoredValue;
pub use unified::UnifiedStore;
pub use version_chain::VersionChain;
