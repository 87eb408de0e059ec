//! # Ledger Executor
//!
//! The public API of the review event contract.
//!
//! This is the only crate hosts need to import. It provides:
//! - [`Executor`] - Runs contract transactions against a ledger
//! - [`Command`]/[`Output`] - Typed calls and results
//! - [`Gateway`] - Multi-step participant workflows
//!
//! ## Quick Start
//!
//! ```text
//! use ledger_executor::{Executor, LedgerConfig};
//!
//! let executor = Executor::open(LedgerConfig::default())?;
//! executor.invoke("InitLedger", &[])?;
//! let payload = executor.invoke("QueryEvent", &["Event0".to_string()])?;
//! ```
//!
//! ## Transactions
//!
//! | Name | Kind | Result |
//! |------|------|--------|
//! | `InitLedger` | submit | none |
//! | `RegisterEvent` | submit | none |
//! | `QueryEvent` | evaluate | Event |
//! | `QueryAllEvents` | evaluate | `[{Key, Record}]` |
//! | `ChangeEventUser` | submit | none |
//! | `ChangeEventStatus` | submit | none |
//! | `GetHistory` | evaluate | `[{record, txId, timestamp, isDelete}]` |

mod command;
mod contract;
mod convert;
mod error;
mod executor;
mod gateway;
mod output;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything hosts need is re-exported here
// =============================================================================

pub use command::Command;
pub use contract::{lookup, resolve, FunctionSpec, TransactionKind, FUNCTIONS};
pub use error::Error;
pub use executor::Executor;
pub use gateway::Gateway;
pub use output::Output;

// Re-export record types so hosts don't need ledger-primitives directly
pub use ledger_primitives::{Event, EventStatus, HistoryQueryResult, NewEvent, QueryResult};

// Re-export configuration so hosts don't need ledger-engine directly
pub use ledger_engine::{LedgerConfig, CONFIG_FILE_NAME};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
