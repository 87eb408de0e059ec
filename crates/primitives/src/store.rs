//! EventStore: the repository bound to an in-process ledger
//!
//! ## Design
//!
//! EventStore is a stateless facade over the engine. It holds an
//! `Arc<Ledger>` and runs each repository operation in its own transaction,
//! so writes are all-or-nothing per call and a racing read-modify-write
//! fails with `Conflict`.
//!
//! EventStore is `Send + Sync`; clones share the same ledger.

use std::sync::Arc;

use ledger_core::{Key, Result};
use ledger_engine::{Ledger, LedgerConfig};

use crate::bootstrap;
use crate::event::{Event, HistoryQueryResult, NewEvent, QueryResult};
use crate::repository::{EventRepository, RepositoryOptions};

/// Review event operations over a shared ledger
///
/// # Example
///
/// ```ignore
/// let store = EventStore::open(LedgerConfig::default())?;
/// store.register_event("Event10", new_event)?;
/// store.change_event_status("Event10", "done")?;
/// let history = store.get_history("Event10")?;
/// ```
#[derive(Clone)]
pub struct EventStore {
    ledger: Arc<Ledger>,
    repository: EventRepository,
}

impl EventStore {
    /// Bind a repository to `ledger`, taking options from its configuration
    pub fn new(ledger: Arc<Ledger>) -> Self {
        let options = RepositoryOptions {
            stamp_mutations: ledger.config().stamp_mutations,
        };
        Self {
            ledger,
            repository: EventRepository::with_options(options),
        }
    }

    /// Open a fresh ledger; seeds the initial events when `config.bootstrap` is set
    pub fn open(config: LedgerConfig) -> Result<Self> {
        let bootstrap = config.bootstrap;
        let store = Self::new(Arc::new(Ledger::with_config(config)));
        if bootstrap {
            store.init_ledger()?;
        }
        Ok(store)
    }

    /// Underlying ledger
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Repository used for every operation
    pub fn repository(&self) -> &EventRepository {
        &self.repository
    }

    /// Seed `Event0..Event3` in one transaction
    pub fn init_ledger(&self) -> Result<()> {
        self.ledger
            .transaction(|txn| bootstrap::init_ledger(&self.repository, txn))
    }

    /// Register a new event at `key`, overwriting any existing record
    pub fn register_event(&self, key: &str, new_event: NewEvent) -> Result<()> {
        let key = Key::from(key);
        self.ledger
            .transaction(|txn| self.repository.register_event(txn, &key, new_event))
    }

    /// Current record at `key`
    pub fn query_event(&self, key: &str) -> Result<Event> {
        let key = Key::from(key);
        self.ledger
            .transaction(|txn| self.repository.query_event(txn, &key))
    }

    /// Every record in key order
    pub fn query_all_events(&self) -> Result<Vec<QueryResult>> {
        self.ledger
            .transaction(|txn| self.repository.query_all_events(txn))
    }

    /// Assign a participant
    pub fn change_event_user(&self, key: &str, new_user: &str) -> Result<()> {
        let key = Key::from(key);
        self.ledger
            .transaction(|txn| self.repository.change_event_user(txn, &key, new_user))
    }

    /// Overwrite the status
    pub fn change_event_status(&self, key: &str, new_status: &str) -> Result<()> {
        let key = Key::from(key);
        self.ledger
            .transaction(|txn| self.repository.change_event_status(txn, &key, new_status))
    }

    /// Every committed version of `key`, oldest first
    pub fn get_history(&self, key: &str) -> Result<Vec<HistoryQueryResult>> {
        let key = Key::from(key);
        self.ledger
            .transaction(|txn| self.repository.get_history(txn, &key))
    }
}
