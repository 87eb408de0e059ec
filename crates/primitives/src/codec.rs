//! Record codec: Event <-> JSON bytes
//!
//! One decode path serves both reads. `Strict` surfaces malformed bytes as
//! `LedgerError::Decode`; `BestEffort` substitutes the zero-valued Event so a
//! history walk is not aborted by one corrupt version.

use ledger_core::{Key, LedgerError, Result};
use tracing::warn;

use crate::event::Event;

/// How [`decode`] treats bytes that are not a valid Event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Fail with `LedgerError::Decode`
    Strict,
    /// Log and return `Event::default()`
    BestEffort,
}

/// Encode an event as stored bytes
///
/// Never fails for an `Event`; the `Result` carries serde_json's writer error type.
pub fn encode(event: &Event) -> Result<Vec<u8>> {
    serde_json::to_vec(event)
        .map_err(|e| LedgerError::invalid_input(format!("failed to encode event: {}", e)))
}

/// Decode the bytes stored at `key`
///
/// Empty bytes are the value of a deletion; in `BestEffort` mode they decode
/// to the zero-valued Event without a warning.
pub fn decode(key: &Key, bytes: &[u8], mode: DecodeMode) -> Result<Event> {
    if bytes.is_empty() && mode == DecodeMode::BestEffort {
        return Ok(Event::default());
    }
    match serde_json::from_slice::<Event>(bytes) {
        Ok(event) => Ok(event),
        Err(e) => match mode {
            DecodeMode::Strict => Err(LedgerError::decode(key.clone(), e.to_string())),
            DecodeMode::BestEffort => {
                warn!(
                    target: "ledger::codec",
                    key = %key,
                    error = %e,
                    "Undecodable record replaced by zero value"
                );
                Ok(Event::default())
            }
        },
    }
}
