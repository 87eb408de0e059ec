//! Error types for the review event ledger
//!
//! This module defines the error taxonomy shared by every layer.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `Store` | A read, write or scan against the world state failed |
//! | `NotFound` | A single-key lookup found no value |
//! | `Decode` | Stored bytes could not be decoded into a record |
//! | `Conflict` | Commit-time validation rejected the transaction |
//! | `TransactionNotActive` | An operation ran on a finished transaction |
//! | `InvalidInput` | Caller-supplied arguments were malformed |
//!
//! Errors are surfaced to callers verbatim; the ledger never retries.

use crate::types::Key;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for the review event ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The underlying store reported a failure
    #[error("store error: {message}")]
    Store {
        /// Description of the store failure
        message: String,
    },

    /// A key that must exist has no value
    #[error("{key} does not exist")]
    NotFound {
        /// The missing key
        key: Key,
    },

    /// Stored bytes are not a valid record
    #[error("failed to decode record at {key}: {reason}")]
    Decode {
        /// Key whose value failed to decode
        key: Key,
        /// Decoder message
        reason: String,
    },

    /// Commit-time validation failed
    #[error("transaction conflict: {reason}")]
    Conflict {
        /// Which reads were invalidated
        reason: String,
    },

    /// The transaction is not accepting operations
    #[error("transaction not active: {state}")]
    TransactionNotActive {
        /// Current transaction state
        state: String,
    },

    /// Caller supplied malformed input
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },
}

impl LedgerError {
    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        LedgerError::Store {
            message: message.into(),
        }
    }

    /// Create a not-found error for `key`
    pub fn not_found(key: impl Into<Key>) -> Self {
        LedgerError::NotFound { key: key.into() }
    }

    /// Create a decode error for `key`
    pub fn decode(key: impl Into<Key>, reason: impl Into<String>) -> Self {
        LedgerError::Decode {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(reason: impl Into<String>) -> Self {
        LedgerError::Conflict {
            reason: reason.into(),
        }
    }

    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        LedgerError::InvalidInput {
            message: message.into(),
        }
    }

    /// Prefix a store error with context, leaving other variants untouched
    ///
    /// Used by the accessor layer to say which world-state operation failed.
    pub fn with_store_context(self, context: &str) -> Self {
        match self {
            LedgerError::Store { message } => LedgerError::Store {
                message: format!("{}: {}", context, message),
            },
            other => other,
        }
    }

    /// Is this a store failure?
    pub fn is_store(&self) -> bool {
        matches!(self, LedgerError::Store { .. })
    }

    /// Is this a missing-key error?
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }

    /// Is this a decode failure?
    pub fn is_decode(&self) -> bool {
        matches!(self, LedgerError::Decode { .. })
    }

    /// Is this a commit conflict?
    pub fn is_conflict(&self) -> bool {
        matches!(self, LedgerError::Conflict { .. })
    }
}
