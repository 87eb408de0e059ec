//! Review event primitives
//!
//! Event records and the contract operations over them:
//! - **Event**: the stored record, plus its listing and history result shapes
//! - **codec**: Event <-> JSON bytes, with strict and best-effort decoding
//! - **LedgerAccessor**: get/put/range/history against the ambient `LedgerContext`
//! - **EventRepository**: register, query, list, mutate and history operations
//! - **bootstrap**: the initial `Event0..Event3` records
//! - **EventStore**: stateless facade running each operation in its own transaction
//!
//! ## Design Principle: Explicit Context
//!
//! Repository operations never reach for a global. They take the transaction
//! as a `&mut C: LedgerContext` argument:
//!
//! ```rust,ignore
//! use ledger_primitives::{EventRepository, NewEvent};
//!
//! let repo = EventRepository::new();
//! ledger.transaction(|txn| {
//!     repo.register_event(txn, &Key::from("Event10"), new_event)?;
//!     repo.change_event_user(txn, &Key::from("Event10"), "alice")
//! })?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod bootstrap;
pub mod codec;
pub mod event;
pub mod repository;
pub mod store;

pub use accessor::LedgerAccessor;
pub use bootstrap::{init_ledger, seed_events};
pub use codec::{decode, encode, DecodeMode};
pub use event::{zero_time, Event, EventStatus, HistoryQueryResult, NewEvent, QueryResult};
pub use repository::{EventRepository, RepositoryOptions};
pub use store::EventStore;
