//! Keys, key ranges and transaction identifiers
//!
//! Keys are opaque strings chosen by callers (e.g. `Event0`). The store
//! orders them byte-lexicographically, which is exactly `str` ordering.
//!
//! A [`KeyRange`] has an inclusive start and an exclusive end. A missing
//! bound means "unbounded", and [`KeyRange::full`] is the full-scan
//! sentinel. The empty string is an ordinary key, never a wildcard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Bound;

/// A ledger key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Create a key from any string-like value
    pub fn new(key: impl Into<String>) -> Self {
        Key(key.into())
    }

    /// Borrow the key text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Consume the key, returning its text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key(s.clone())
    }
}

impl From<&Key> for Key {
    fn from(k: &Key) -> Self {
        k.clone()
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An ordered key range: `start` inclusive, `end` exclusive
///
/// `None` on either side leaves that side unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyRange {
    start: Option<Key>,
    end: Option<Key>,
}

impl KeyRange {
    /// Every key in the store
    pub fn full() -> Self {
        KeyRange {
            start: None,
            end: None,
        }
    }

    /// Keys in `[start, end)`
    pub fn between(start: impl Into<Key>, end: impl Into<Key>) -> Self {
        KeyRange {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Keys at or after `start`
    pub fn starting_at(start: impl Into<Key>) -> Self {
        KeyRange {
            start: Some(start.into()),
            end: None,
        }
    }

    /// Keys strictly before `end`
    pub fn until(end: impl Into<Key>) -> Self {
        KeyRange {
            start: None,
            end: Some(end.into()),
        }
    }

    /// Is this the full-scan sentinel?
    pub fn is_full(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Inclusive lower bound, if any
    pub fn start(&self) -> Option<&Key> {
        self.start.as_ref()
    }

    /// Exclusive upper bound, if any
    pub fn end(&self) -> Option<&Key> {
        self.end.as_ref()
    }

    /// Does the range contain `key`?
    pub fn contains(&self, key: &Key) -> bool {
        let after_start = self.start.as_ref().map_or(true, |s| key >= s);
        let before_end = self.end.as_ref().map_or(true, |e| key < e);
        after_start && before_end
    }

    /// Can no key satisfy this range?
    pub fn is_empty(&self) -> bool {
        matches!((&self.start, &self.end), (Some(s), Some(e)) if s >= e)
    }

    /// Bounds suitable for `BTreeMap::range`
    ///
    /// Callers must check [`KeyRange::is_empty`] first; `BTreeMap::range`
    /// panics when start > end.
    pub fn bounds(&self) -> (Bound<&Key>, Bound<&Key>) {
        let lower = match &self.start {
            Some(s) => Bound::Included(s),
            None => Bound::Unbounded,
        };
        let upper = match &self.end {
            Some(e) => Bound::Excluded(e),
            None => Bound::Unbounded,
        };
        (lower, upper)
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.start, &self.end) {
            (None, None) => f.write_str("[*]"),
            (Some(s), None) => write!(f, "[{:?}, *)", s.as_str()),
            (None, Some(e)) => write!(f, "[*, {:?})", e.as_str()),
            (Some(s), Some(e)) => write!(f, "[{:?}, {:?})", s.as_str(), e.as_str()),
        }
    }
}

/// Identifier of the transaction that committed a version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Generate a fresh random transaction id
    pub fn generate() -> Self {
        TxId(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        TxId(id.into())
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry yielded by a range scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Entry key
    pub key: Key,
    /// Raw stored bytes
    pub value: Vec<u8>,
}

impl KeyValue {
    /// Create a key/value pair
    pub fn new(key: impl Into<Key>, value: Vec<u8>) -> Self {
        KeyValue {
            key: key.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ordering_is_bytewise() {
        let mut keys = vec![Key::from("Event10"), Key::from("Event2"), Key::from("Event1")];
        keys.sort();
        let sorted: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
        assert_eq!(sorted, vec!["Event1", "Event10", "Event2"]);
    }

    #[test]
    fn test_full_range_contains_everything() {
        let range = KeyRange::full();
        assert!(range.is_full());
        assert!(range.contains(&Key::from("")));
        assert!(range.contains(&Key::from("zzz")));
    }

    #[test]
    fn test_between_is_half_open() {
        let range = KeyRange::between("Event1", "Event3");
        assert!(range.contains(&Key::from("Event1")));
        assert!(range.contains(&Key::from("Event2")));
        assert!(!range.contains(&Key::from("Event3")));
        assert!(!range.contains(&Key::from("Event0")));
    }

    #[test]
    fn test_empty_string_bounds_are_not_wildcards() {
        let range = KeyRange::between("", "");
        assert!(!range.is_full());
        assert!(range.is_empty());
        assert!(!range.contains(&Key::from("Event0")));
    }

    #[test]
    fn test_one_sided_ranges() {
        assert!(KeyRange::starting_at("b").contains(&Key::from("c")));
        assert!(!KeyRange::starting_at("b").contains(&Key::from("a")));
        assert!(KeyRange::until("b").contains(&Key::from("a")));
        assert!(!KeyRange::until("b").contains(&Key::from("b")));
    }

    #[test]
    fn test_txid_generate_is_unique() {
        let a = TxId::generate();
        let b = TxId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let json = serde_json::to_string(&Key::from("Event0")).unwrap();
        assert_eq!(json, "\"Event0\"");
    }
}
