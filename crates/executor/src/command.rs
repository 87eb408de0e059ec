//! Command enum defining every contract transaction.
//!
//! Commands are:
//! - **Self-contained**: All parameters needed for execution are in the variant
//! - **Serializable**: Can be converted to/from JSON for cross-language use
//! - **Typed**: Prices and limits are integers, not text
//!
//! Callers that hold text arguments (a CLI, a gateway) build commands with
//! [`Command::from_invocation`].

use serde::{Deserialize, Serialize};

use ledger_primitives::NewEvent;

use crate::contract::{self, TransactionKind};
use crate::{Error, Result};

/// A self-contained, serializable contract call.
///
/// # Example
///
/// ```ignore
/// let cmd = Command::from_invocation("ChangeEventUser", &["Event0".into(), "alice".into()])?;
/// assert_eq!(cmd, Command::ChangeEventUser { event_num: "Event0".into(), new_user: "alice".into() });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    /// Seed Event0..Event3.
    /// Returns: `Output::Unit`
    InitLedger,

    /// Create or overwrite an event.
    /// Returns: `Output::Unit`
    RegisterEvent {
        event_num: String,
        #[serde(rename = "type")]
        kind: String,
        host: String,
        target: String,
        service_product: String,
        min_price: i64,
        max_num: i64,
        expire_date: String,
    },

    /// Read one event.
    /// Returns: `Output::Event`
    QueryEvent { event_num: String },

    /// List every event.
    /// Returns: `Output::Events`
    QueryAllEvents,

    /// Assign a participant.
    /// Returns: `Output::Unit`
    ChangeEventUser { event_num: String, new_user: String },

    /// Overwrite the status.
    /// Returns: `Output::Unit`
    ChangeEventStatus { event_num: String, new_status: String },

    /// Committed versions of a key.
    /// Returns: `Output::History`
    GetHistory { key: String },
}

impl Command {
    /// Build a command from a transaction name and its text arguments
    ///
    /// # Errors
    ///
    /// - `UnknownFunction` if `name` is not registered
    /// - `ArgumentCount` if `args` has the wrong length
    /// - `InvalidInput` if `minPrice` or `maxNum` is not a decimal integer
    pub fn from_invocation(name: &str, args: &[String]) -> Result<Self> {
        let spec = contract::lookup(name).ok_or_else(|| Error::UnknownFunction {
            name: name.to_string(),
        })?;
        if args.len() != spec.arity() {
            return Err(Error::ArgumentCount {
                function: spec.name.to_string(),
                expected: spec.arity(),
                actual: args.len(),
            });
        }

        let arg = |i: usize| args[i].clone();
        let cmd = match spec.name {
            "InitLedger" => Command::InitLedger,
            "RegisterEvent" => Command::RegisterEvent {
                event_num: arg(0),
                kind: arg(1),
                host: arg(2),
                target: arg(3),
                service_product: arg(4),
                min_price: parse_int("minPrice", &args[5])?,
                max_num: parse_int("maxNum", &args[6])?,
                expire_date: arg(7),
            },
            "QueryEvent" => Command::QueryEvent { event_num: arg(0) },
            "QueryAllEvents" => Command::QueryAllEvents,
            "ChangeEventUser" => Command::ChangeEventUser {
                event_num: arg(0),
                new_user: arg(1),
            },
            "ChangeEventStatus" => Command::ChangeEventStatus {
                event_num: arg(0),
                new_status: arg(1),
            },
            "GetHistory" => Command::GetHistory { key: arg(0) },
            other => {
                return Err(Error::UnknownFunction {
                    name: other.to_string(),
                })
            }
        };
        Ok(cmd)
    }

    /// Registered transaction name
    pub fn name(&self) -> &'static str {
        match self {
            Command::InitLedger => "InitLedger",
            Command::RegisterEvent { .. } => "RegisterEvent",
            Command::QueryEvent { .. } => "QueryEvent",
            Command::QueryAllEvents => "QueryAllEvents",
            Command::ChangeEventUser { .. } => "ChangeEventUser",
            Command::ChangeEventStatus { .. } => "ChangeEventStatus",
            Command::GetHistory { .. } => "GetHistory",
        }
    }

    /// Whether the command writes
    pub fn kind(&self) -> TransactionKind {
        match self {
            Command::QueryEvent { .. } | Command::QueryAllEvents | Command::GetHistory { .. } => {
                TransactionKind::Evaluate
            }
            _ => TransactionKind::Submit,
        }
    }

    /// Split a `RegisterEvent` into its key and record arguments
    pub(crate) fn into_registration(self) -> Option<(String, NewEvent)> {
        match self {
            Command::RegisterEvent {
                event_num,
                kind,
                host,
                target,
                service_product,
                min_price,
                max_num,
                expire_date,
            } => Some((
                event_num,
                NewEvent {
                    kind,
                    host,
                    target,
                    service_product,
                    min_price,
                    max_num,
                    expire_date,
                },
            )),
            _ => None,
        }
    }
}

/// Parse a decimal integer argument (optional sign, no whitespace)
fn parse_int(param: &str, text: &str) -> Result<i64> {
    text.parse::<i64>().map_err(|e| Error::InvalidInput {
        reason: format!("{} must be a decimal integer, got {:?}: {}", param, text, e),
    })
}
