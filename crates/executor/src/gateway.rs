//! Client gateway workflows
//!
//! Multi-step flows a client runs against the contract. Each step is a
//! separate submitted transaction; the first failure stops the flow and is
//! returned, leaving earlier steps committed.

use ledger_primitives::EventStatus;
use tracing::info;

use crate::{Command, Executor, Result};

/// Participant-facing workflows over an [`Executor`]
#[derive(Clone)]
pub struct Gateway {
    executor: Executor,
}

impl Gateway {
    /// Wrap an executor
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Underlying executor
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// `user` joins the event at `key`: assign, then mark in progress
    pub fn join_event(&self, key: &str, user: &str) -> Result<()> {
        self.assign_then_set(key, user, EventStatus::InProgress)?;
        info!(target: "ledger::gateway", key, user, "Joined event");
        Ok(())
    }

    /// `user` reports on the event at `key`; `written` picks done or incomplete
    pub fn submit_review(&self, key: &str, user: &str, written: bool) -> Result<()> {
        let status = EventStatus::for_review(written);
        self.assign_then_set(key, user, status)?;
        info!(target: "ledger::gateway", key, user, status = %status, "Review submitted");
        Ok(())
    }

    fn assign_then_set(&self, key: &str, user: &str, status: EventStatus) -> Result<()> {
        self.executor.execute(Command::ChangeEventUser {
            event_num: key.to_string(),
            new_user: user.to_string(),
        })?;
        self.executor.execute(Command::ChangeEventStatus {
            event_num: key.to_string(),
            new_status: status.as_str().to_string(),
        })?;
        Ok(())
    }
}
