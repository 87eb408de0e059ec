//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant. [`Output::to_payload`]
//! turns it into the bytes a caller receives: JSON for records, nothing for
//! unit results.

use serde::{Deserialize, Serialize};

use ledger_primitives::{Event, HistoryQueryResult, QueryResult};

use crate::{Error, Result};

/// Successful command execution results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (writes)
    Unit,

    /// One record (QueryEvent)
    Event(Event),

    /// Key/record pairs in key order (QueryAllEvents)
    Events(Vec<QueryResult>),

    /// Committed versions, oldest first (GetHistory)
    History(Vec<HistoryQueryResult>),
}

impl Output {
    /// Encode as the caller-facing payload
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        let encoded = match self {
            Output::Unit => return Ok(Vec::new()),
            Output::Event(event) => serde_json::to_vec(event),
            Output::Events(results) => serde_json::to_vec(results),
            Output::History(history) => serde_json::to_vec(history),
        };
        encoded.map_err(|e| Error::Serialization {
            reason: e.to_string(),
        })
    }
}
