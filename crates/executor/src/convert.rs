//! Error conversion from internal error types.
//!
//! This module provides conversions from [`LedgerError`] to the executor's
//! [`Error`] type.

use ledger_core::LedgerError;

use crate::Error;

/// Convert a LedgerError to an executor Error.
///
/// Messages are carried over verbatim.
impl From<LedgerError> for Error {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound { key } => Error::NotFound {
                key: key.into_string(),
            },
            LedgerError::Decode { key, reason } => Error::Decode {
                key: key.into_string(),
                reason,
            },
            LedgerError::Store { message } => Error::Store { reason: message },
            LedgerError::Conflict { reason } => Error::Conflict { reason },
            LedgerError::TransactionNotActive { state } => Error::TransactionNotActive { state },
            LedgerError::InvalidInput { message } => Error::InvalidInput { reason: message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::Key;

    #[test]
    fn test_not_found_keeps_message() {
        let err: Error = LedgerError::not_found(Key::from("Event99")).into();
        assert_eq!(err, Error::NotFound { key: "Event99".into() });
        assert_eq!(err.to_string(), "Event99 does not exist");
    }

    #[test]
    fn test_store_context_survives() {
        let err = LedgerError::store("disk unplugged").with_store_context("failed to read from world state");
        let converted: Error = err.into();
        match converted {
            Error::Store { reason } => {
                assert_eq!(reason, "failed to read from world state: disk unplugged")
            }
            other => panic!("Expected Store, got {:?}", other),
        }
    }

    #[test]
    fn test_decode() {
        let converted: Error = LedgerError::decode(Key::from("Event1"), "eof").into();
        match converted {
            Error::Decode { key, reason } => {
                assert_eq!(key, "Event1");
                assert_eq!(reason, "eof");
            }
            other => panic!("Expected Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_conflict() {
        let converted: Error = LedgerError::conflict("Event0 changed").into();
        assert!(converted.is_conflict());
    }

    #[test]
    fn test_invalid_input() {
        let converted: Error = LedgerError::invalid_input("contract_name is empty").into();
        assert_eq!(
            converted,
            Error::InvalidInput {
                reason: "contract_name is empty".into()
            }
        );
    }
}
