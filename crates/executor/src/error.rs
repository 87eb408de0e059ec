//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Lossless**: No error information is lost in conversion from internal errors

use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Not Found | `NotFound` | Event key has no record |
/// | Record | `Decode` | Stored bytes are not a valid event |
/// | Store | `Store` | World-state read or write failed |
/// | Concurrency | `Conflict` | Commit-time validation rejected the transaction |
/// | Invocation | `UnknownFunction`, `ArgumentCount`, `InvalidInput` | Bad call |
/// | Transaction | `TransactionNotActive` | Transaction state |
/// | System | `Serialization` | Result could not be encoded |
///
/// # Example
///
/// ```ignore
/// match executor.invoke("QueryEvent", &["Event99".to_string()]) {
///     Ok(payload) => { /* handle success */ }
///     Err(Error::NotFound { key }) => println!("{} does not exist", key),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Not Found ====================
    /// No record at the key
    #[error("{key} does not exist")]
    NotFound { key: String },

    // ==================== Record Errors ====================
    /// Stored bytes could not be decoded
    #[error("failed to decode record at {key}: {reason}")]
    Decode { key: String, reason: String },

    // ==================== Store Errors ====================
    /// World-state failure
    #[error("{reason}")]
    Store { reason: String },

    // ==================== Concurrency Errors ====================
    /// Commit-time validation failed
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    // ==================== Invocation Errors ====================
    /// Malformed argument
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// No transaction with this name
    #[error("unknown function: {name}")]
    UnknownFunction { name: String },

    /// Wrong number of arguments
    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    // ==================== Transaction Errors ====================
    /// Transaction no longer accepts operations
    #[error("transaction not active: {state}")]
    TransactionNotActive { state: String },

    // ==================== System Errors ====================
    /// Result encoding failed
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl Error {
    /// Is this a missing-record error?
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Is this a commit conflict?
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}
