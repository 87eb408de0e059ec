//! EventRepository: the review event contract operations
//!
//! ## Design
//!
//! The repository is stateless apart from its options. Every operation takes
//! the ambient transaction as an explicit `&mut C: LedgerContext` and goes
//! through a [`LedgerAccessor`], so the same code runs against the in-process
//! ledger, a test double, or any other host that implements the boundary.
//!
//! ## Semantics
//!
//! - `register_event` overwrites an existing key without checking
//! - `change_event_user` / `change_event_status` are full read-modify-writes
//!   and accept any string
//! - `query_event` and `query_all_events` decode strictly; one bad record
//!   fails the whole listing
//! - `get_history` decodes best-effort; deletions and undecodable versions
//!   become the zero-valued Event
//!
//! No operation retries or validates business rules.

use ledger_core::{Key, KeyRange, LedgerContext, LedgerError, Result};
use tracing::debug;

use crate::accessor::LedgerAccessor;
use crate::codec::{self, DecodeMode};
use crate::event::{Event, HistoryQueryResult, NewEvent, QueryResult};

/// Behavior switches for [`EventRepository`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Set `Event::timestamp` to the transaction timestamp on every write
    pub stamp_mutations: bool,
}

/// Contract operations over event records
#[derive(Debug, Clone, Default)]
pub struct EventRepository {
    options: RepositoryOptions,
}

impl EventRepository {
    /// Repository with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository with explicit options
    pub fn with_options(options: RepositoryOptions) -> Self {
        Self { options }
    }

    /// Active options
    pub fn options(&self) -> RepositoryOptions {
        self.options
    }

    /// Store a new event at `key` with no user and status `regi`
    ///
    /// An existing record at `key` is overwritten.
    pub fn register_event<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        key: &Key,
        new_event: NewEvent,
    ) -> Result<()> {
        debug!(target: "ledger::contract", key = %key, "RegisterEvent");
        let mut accessor = LedgerAccessor::new(ctx);
        self.store(&mut accessor, key, new_event.into_event())
    }

    /// Current record at `key`
    ///
    /// # Errors
    /// - `NotFound` if the key is absent
    /// - `Decode` if the stored bytes are not an Event
    /// - `Store` if the read fails
    pub fn query_event<C: LedgerContext + ?Sized>(&self, ctx: &mut C, key: &Key) -> Result<Event> {
        debug!(target: "ledger::contract", key = %key, "QueryEvent");
        let mut accessor = LedgerAccessor::new(ctx);
        Self::load(&mut accessor, key)
    }

    /// Every record in key order
    ///
    /// Fails on the first record that does not decode.
    pub fn query_all_events<C: LedgerContext + ?Sized>(&self, ctx: &mut C) -> Result<Vec<QueryResult>> {
        let mut accessor = LedgerAccessor::new(ctx);
        let cursor = accessor.range_scan(&KeyRange::full())?;

        let mut results = Vec::new();
        for item in cursor {
            let kv = item?;
            let record = codec::decode(&kv.key, &kv.value, DecodeMode::Strict)?;
            results.push(QueryResult {
                key: kv.key.into_string(),
                record,
            });
        }

        debug!(target: "ledger::contract", count = results.len(), "QueryAllEvents");
        Ok(results)
    }

    /// Assign `new_user` to the event at `key`
    pub fn change_event_user<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        key: &Key,
        new_user: &str,
    ) -> Result<()> {
        debug!(target: "ledger::contract", key = %key, user = new_user, "ChangeEventUser");
        self.update(ctx, key, |event| event.user = new_user.to_string())
    }

    /// Set the status of the event at `key`; any string is accepted
    pub fn change_event_status<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        key: &Key,
        new_status: &str,
    ) -> Result<()> {
        debug!(target: "ledger::contract", key = %key, status = new_status, "ChangeEventStatus");
        self.update(ctx, key, |event| event.status = new_status.to_string())
    }

    /// Every committed version of `key`, oldest first
    ///
    /// An unknown key has an empty history. Only a failing scan is an error.
    pub fn get_history<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        key: &Key,
    ) -> Result<Vec<HistoryQueryResult>> {
        debug!(target: "ledger::contract", key = %key, "GetHistory");
        let mut accessor = LedgerAccessor::new(ctx);
        let cursor = accessor.history_scan(key)?;

        let mut records = Vec::new();
        for item in cursor {
            let entry = item?;
            let record = if entry.is_delete || entry.value.is_empty() {
                Event::default()
            } else {
                codec::decode(key, &entry.value, DecodeMode::BestEffort)?
            };
            records.push(HistoryQueryResult {
                record,
                tx_id: entry.tx_id.to_string(),
                timestamp: entry.timestamp.to_datetime(),
                is_delete: entry.is_delete,
            });
        }
        Ok(records)
    }

    fn update<C, F>(&self, ctx: &mut C, key: &Key, mutate: F) -> Result<()>
    where
        C: LedgerContext + ?Sized,
        F: FnOnce(&mut Event),
    {
        let mut accessor = LedgerAccessor::new(ctx);
        let mut event = Self::load(&mut accessor, key)?;
        mutate(&mut event);
        self.store(&mut accessor, key, event)
    }

    fn load<C: LedgerContext + ?Sized>(accessor: &mut LedgerAccessor<'_, C>, key: &Key) -> Result<Event> {
        let bytes = accessor
            .get(key)?
            .ok_or_else(|| LedgerError::not_found(key))?;
        codec::decode(key, &bytes, DecodeMode::Strict)
    }

    fn store<C: LedgerContext + ?Sized>(
        &self,
        accessor: &mut LedgerAccessor<'_, C>,
        key: &Key,
        mut event: Event,
    ) -> Result<()> {
        if self.options.stamp_mutations {
            event.timestamp = accessor.tx_timestamp().to_datetime();
        }
        let bytes = codec::encode(&event)?;
        accessor.put(key.clone(), bytes)
    }
}
