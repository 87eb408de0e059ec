//! review-ledger - versioned review event ledger
//!
//! Review events are stored as JSON records in an ordered, versioned
//! key-value world state. Every change is a committed transaction, so the
//! full history of each event can be read back oldest-first.
//!
//! # Quick Start
//!
//! ```ignore
//! use review_ledger::{Executor, LedgerConfig};
//!
//! let executor = Executor::open(LedgerConfig::default())?;
//! executor.invoke("InitLedger", &[])?;
//! executor.invoke("ChangeEventUser", &["Event0".into(), "alice".into()])?;
//! let history = executor.invoke("GetHistory", &["Event0".into()])?;
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which runs each named
//! transaction in its own ledger transaction. [`Gateway`] layers the
//! participant workflows on top.
//!
//! Internal implementation details (storage, concurrency, engine) are not
//! exposed - only the executor API is public.

// Re-export the public API from ledger-executor
pub use ledger_executor::*;
