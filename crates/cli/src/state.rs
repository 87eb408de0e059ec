//! Session wrapper around the gateway.

use ledger_executor::{Executor, Gateway, LedgerConfig, Output, Result};

use crate::parse::CliAction;

/// Holds the ledger handle for the life of the process.
pub struct SessionState {
    gateway: Gateway,
}

impl SessionState {
    /// Open a fresh ledger with `config`.
    pub fn open(config: LedgerConfig) -> Result<Self> {
        Ok(Self {
            gateway: Gateway::new(Executor::open(config)?),
        })
    }

    /// Run one parsed action; workflows return `Output::Unit`.
    pub fn run(&self, action: CliAction) -> Result<Output> {
        match action {
            CliAction::Invoke { function, args } => {
                let executor = self.gateway.executor();
                let cmd = executor.command(&function, &args)?;
                executor.execute(cmd)
            }
            CliAction::Join { key, user } => {
                self.gateway.join_event(&key, &user)?;
                Ok(Output::Unit)
            }
            CliAction::Review { key, user, written } => {
                self.gateway.submit_review(&key, &user, written)?;
                Ok(Output::Unit)
            }
        }
    }
}
