//! Event record and the result shapes returned to callers
//!
//! Field names are part of the stored format: records written by earlier
//! deployments must keep decoding, so every field falls back to its zero
//! value when missing and unknown fields are ignored.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds from the Unix epoch back to 0001-01-01T00:00:00Z
const ZERO_TIME_UNIX_SECS: i64 = -62_135_596_800;

/// The zero timestamp, `0001-01-01T00:00:00Z`
///
/// Records that were never stamped carry this value.
pub fn zero_time() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ZERO_TIME_UNIX_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Returns true if `ts` is the zero timestamp
pub fn is_zero_time(ts: &DateTime<Utc>) -> bool {
    *ts == zero_time()
}

/// A promotional campaign stored under one ledger key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// Category tag: default, receipt, photo, text, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Who created the event
    pub host: String,
    /// Product or subject of the event
    pub target: String,
    /// Comma-separated reward items, e.g. `coke_1,cheese-crust_1`
    #[serde(rename = "serviceProduct")]
    pub service_product: String,
    /// Minimum qualifying purchase amount
    #[serde(rename = "minPrice")]
    pub min_price: i64,
    /// Participant cap; 0 means unspecified
    #[serde(rename = "maxLimit")]
    pub max_num: i64,
    /// End date, kept as text
    #[serde(rename = "expireDate")]
    pub expire_date: String,
    /// Assigned participant; empty when unassigned
    pub user: String,
    /// Free-text status, see [`EventStatus`] for the known values
    pub status: String,
    /// Last mutation time, zero time when never stamped
    pub timestamp: DateTime<Utc>,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            kind: String::new(),
            host: String::new(),
            target: String::new(),
            service_product: String::new(),
            min_price: 0,
            max_num: 0,
            expire_date: String::new(),
            user: String::new(),
            status: String::new(),
            timestamp: zero_time(),
        }
    }
}

impl Event {
    /// True for the zero-valued record used for tombstones and undecodable history entries
    pub fn is_zero(&self) -> bool {
        *self == Event::default()
    }
}

/// Arguments of a registration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewEvent {
    /// Category tag
    pub kind: String,
    /// Creator
    pub host: String,
    /// Product or subject
    pub target: String,
    /// Reward items
    pub service_product: String,
    /// Minimum qualifying purchase amount
    pub min_price: i64,
    /// Participant cap
    pub max_num: i64,
    /// End date
    pub expire_date: String,
}

impl NewEvent {
    /// Build the stored record: unassigned, status `regi`, never stamped
    pub fn into_event(self) -> Event {
        Event {
            kind: self.kind,
            host: self.host,
            target: self.target,
            service_product: self.service_product,
            min_price: self.min_price,
            max_num: self.max_num,
            expire_date: self.expire_date,
            user: String::new(),
            status: EventStatus::Registered.as_str().to_string(),
            timestamp: zero_time(),
        }
    }
}

/// Known lifecycle states: `regi → in-progress → {done, incomplete}`
///
/// Nothing enforces these; `Event::status` accepts any string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    /// Registered, nobody has joined yet
    Registered,
    /// A participant joined
    InProgress,
    /// The participant wrote the review
    Done,
    /// The participant did not write the review
    Incomplete,
}

impl EventStatus {
    /// All known states in lifecycle order
    pub const ALL: [EventStatus; 4] = [
        EventStatus::Registered,
        EventStatus::InProgress,
        EventStatus::Done,
        EventStatus::Incomplete,
    ];

    /// Stored text of this state
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Registered => "regi",
            EventStatus::InProgress => "in-progress",
            EventStatus::Done => "done",
            EventStatus::Incomplete => "incomplete",
        }
    }

    /// Parse stored text; `None` for anything outside the known vocabulary
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Status recorded when a review is submitted
    pub fn for_review(written: bool) -> Self {
        if written {
            EventStatus::Done
        } else {
            EventStatus::Incomplete
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown event status '{}'", s))
    }
}

/// One entry of a full-range listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Ledger key
    #[serde(rename = "Key")]
    pub key: String,
    /// Record stored at the key
    #[serde(rename = "Record")]
    pub record: Event,
}

/// One historical version of a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQueryResult {
    /// Record at this version; zero-valued for deletions
    pub record: Event,
    /// Transaction that committed this version
    #[serde(rename = "txId")]
    pub tx_id: String,
    /// Commit time
    pub timestamp: DateTime<Utc>,
    /// True when this version deleted the key
    #[serde(rename = "isDelete")]
    pub is_delete: bool,
}
