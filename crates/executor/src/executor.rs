//! The Executor - single entry point to the review event contract.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! event store and converts results to outputs.

use ledger_engine::LedgerConfig;
use ledger_primitives::EventStore;
use tracing::debug;

use crate::contract::{self, FunctionSpec};
use crate::{Command, Error, Output, Result};

/// The command executor - single entry point to the contract.
///
/// The Executor is **stateless**: it holds a handle to the event store but
/// maintains no state of its own. Every command runs in its own ledger
/// transaction.
///
/// # Thread Safety
///
/// Executor is `Send + Sync`; clones share the same ledger.
///
/// # Example
///
/// ```ignore
/// let executor = Executor::open(LedgerConfig::default())?;
///
/// // Single command execution
/// executor.execute(Command::InitLedger)?;
///
/// // Text invocation, JSON payload back
/// let payload = executor.invoke("QueryEvent", &["Event0".to_string()])?;
/// ```
#[derive(Clone)]
pub struct Executor {
    store: EventStore,
}

impl Executor {
    /// Create a new executor over an event store.
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }

    /// Open a fresh ledger and wrap it.
    pub fn open(config: LedgerConfig) -> Result<Self> {
        Ok(Self::new(EventStore::open(config)?))
    }

    /// The event store commands run against.
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Every registered transaction.
    pub fn functions(&self) -> &'static [FunctionSpec] {
        contract::FUNCTIONS
    }

    /// Execute a single command.
    ///
    /// Returns the command result or an error.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        debug!(target: "ledger::executor", function = cmd.name(), kind = ?cmd.kind(), "Executing");
        match cmd {
            Command::InitLedger => {
                self.store.init_ledger()?;
                Ok(Output::Unit)
            }
            cmd @ Command::RegisterEvent { .. } => {
                let (key, new_event) = cmd.into_registration().ok_or_else(|| Error::InvalidInput {
                    reason: "expected a RegisterEvent command".to_string(),
                })?;
                self.store.register_event(&key, new_event)?;
                Ok(Output::Unit)
            }
            Command::QueryEvent { event_num } => Ok(Output::Event(self.store.query_event(&event_num)?)),
            Command::QueryAllEvents => Ok(Output::Events(self.store.query_all_events()?)),
            Command::ChangeEventUser { event_num, new_user } => {
                self.store.change_event_user(&event_num, &new_user)?;
                Ok(Output::Unit)
            }
            Command::ChangeEventStatus {
                event_num,
                new_status,
            } => {
                self.store.change_event_status(&event_num, &new_status)?;
                Ok(Output::Unit)
            }
            Command::GetHistory { key } => Ok(Output::History(self.store.get_history(&key)?)),
        }
    }

    /// Name the contract's transactions are registered under.
    pub fn contract_name(&self) -> &str {
        &self.store.ledger().config().contract_name
    }

    /// Build a command from a transaction name and text arguments.
    ///
    /// `name` is either bare (`QueryEvent`) or qualified with this
    /// executor's contract name (`review_event:QueryEvent`).
    pub fn command(&self, name: &str, args: &[String]) -> Result<Command> {
        let function = contract::resolve(self.contract_name(), name)?;
        Command::from_invocation(function, args)
    }

    /// Invoke a transaction by name with text arguments.
    ///
    /// Returns the JSON payload; empty for transactions with no result.
    pub fn invoke(&self, name: &str, args: &[String]) -> Result<Vec<u8>> {
        let cmd = self.command(name, args)?;
        self.execute(cmd)?.to_payload()
    }

    /// Execute multiple commands sequentially.
    ///
    /// Each command is its own transaction. Returns all results in the same
    /// order as the input commands; a failure does not stop later commands.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }
}
