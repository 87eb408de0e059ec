//! Ledger engine for the review event ledger
//!
//! This crate orchestrates the lower layers:
//! - Ledger: owns the world state and exposes the transaction closure API
//! - TransactionCoordinator: snapshot acquisition, commit and metrics
//! - LedgerConfig: settings loaded from `ledger.toml`
//!
//! The engine is the only component that knows about both the store and the
//! transaction manager. Contract code only ever sees a `TransactionContext`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod coordinator;
pub mod ledger;

pub use config::{LedgerConfig, CONFIG_FILE_NAME, DEFAULT_CONTRACT_NAME};
pub use coordinator::{TransactionCoordinator, TransactionMetrics};
pub use ledger::Ledger;
