//! Named transaction registry
//!
//! The contract exposes seven transactions. Each has a fixed parameter
//! list and is either submitted (its writes are committed) or evaluated
//! (read-only).
//!
//! Callers may qualify a name with the contract it is registered under,
//! as in `review_event:QueryEvent`.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How a transaction is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Writes to the world state
    Submit,
    /// Reads only
    Evaluate,
}

/// One named transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSpec {
    /// Name callers invoke
    pub name: &'static str,
    /// Parameter names, in argument order
    pub params: &'static [&'static str],
    /// Submit or evaluate
    pub kind: TransactionKind,
    /// One-line description for help output
    pub summary: &'static str,
}

impl FunctionSpec {
    /// Number of arguments the transaction takes
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `Name(param, ...)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }
}

/// Every transaction the contract registers
pub const FUNCTIONS: &[FunctionSpec] = &[
    FunctionSpec {
        name: "InitLedger",
        params: &[],
        kind: TransactionKind::Submit,
        summary: "Seed Event0..Event3",
    },
    FunctionSpec {
        name: "RegisterEvent",
        params: &[
            "eventNum",
            "type",
            "host",
            "target",
            "serviceProduct",
            "minPrice",
            "maxNum",
            "expireDate",
        ],
        kind: TransactionKind::Submit,
        summary: "Create or overwrite an event",
    },
    FunctionSpec {
        name: "QueryEvent",
        params: &["eventNum"],
        kind: TransactionKind::Evaluate,
        summary: "Read one event",
    },
    FunctionSpec {
        name: "QueryAllEvents",
        params: &[],
        kind: TransactionKind::Evaluate,
        summary: "List every event in key order",
    },
    FunctionSpec {
        name: "ChangeEventUser",
        params: &["eventNum", "newUser"],
        kind: TransactionKind::Submit,
        summary: "Assign a participant",
    },
    FunctionSpec {
        name: "ChangeEventStatus",
        params: &["eventNum", "newStatus"],
        kind: TransactionKind::Submit,
        summary: "Overwrite the status",
    },
    FunctionSpec {
        name: "GetHistory",
        params: &["key"],
        kind: TransactionKind::Evaluate,
        summary: "Every committed version of a key, oldest first",
    },
];

/// Find a transaction by exact name
pub fn lookup(name: &str) -> Option<&'static FunctionSpec> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// Strip a `<contract>:` qualifier from `name`
///
/// Bare names pass through. A qualifier naming any contract other than
/// `contract` is an `UnknownFunction` error.
pub fn resolve<'a>(contract: &str, name: &'a str) -> Result<&'a str> {
    match name.split_once(':') {
        None => Ok(name),
        Some((prefix, function)) if prefix == contract => Ok(function),
        Some(_) => Err(Error::UnknownFunction {
            name: name.to_string(),
        }),
    }
}
