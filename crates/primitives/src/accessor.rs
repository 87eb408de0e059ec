//! Ledger accessor: the four store calls the repository needs
//!
//! A borrowed adapter over the ambient [`LedgerContext`]. It owns no state;
//! it attaches the world-state context to store failures and hands range
//! and history cursors back to the caller unchanged.

use ledger_core::{Cursor, HistoryEntry, Key, KeyRange, KeyValue, LedgerContext, Result, Timestamp};

/// Store context attached to failed reads
pub const READ_CONTEXT: &str = "failed to read from world state";
/// Store context attached to failed writes
pub const WRITE_CONTEXT: &str = "failed to put to world state";

/// Accessor over one transaction's context
pub struct LedgerAccessor<'a, C: LedgerContext + ?Sized> {
    ctx: &'a mut C,
}

impl<'a, C: LedgerContext + ?Sized> LedgerAccessor<'a, C> {
    /// Borrow `ctx` for the duration of one operation
    pub fn new(ctx: &'a mut C) -> Self {
        Self { ctx }
    }

    /// Current bytes at `key`; `None` if never written or deleted
    pub fn get(&mut self, key: &Key) -> Result<Option<Vec<u8>>> {
        self.ctx
            .get_state(key)
            .map_err(|e| e.with_store_context(READ_CONTEXT))
    }

    /// Buffer a write of `value` at `key`
    pub fn put(&mut self, key: Key, value: Vec<u8>) -> Result<()> {
        self.ctx
            .put_state(key, value)
            .map_err(|e| e.with_store_context(WRITE_CONTEXT))
    }

    /// Ordered scan; the cursor releases on drop
    pub fn range_scan(&mut self, range: &KeyRange) -> Result<Cursor<KeyValue>> {
        self.ctx
            .get_state_by_range(range)
            .map_err(|e| e.with_store_context(READ_CONTEXT))
    }

    /// History of `key`, oldest first; the cursor releases on drop
    pub fn history_scan(&mut self, key: &Key) -> Result<Cursor<HistoryEntry>> {
        self.ctx
            .get_history_for_key(key)
            .map_err(|e| e.with_store_context(READ_CONTEXT))
    }

    /// Timestamp of the ambient transaction
    pub fn tx_timestamp(&self) -> Timestamp {
        self.ctx.tx_timestamp()
    }
}
