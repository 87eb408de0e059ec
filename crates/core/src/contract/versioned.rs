//! Generic versioned wrapper type
//!
//! Store reads return data wrapped in `Versioned<T>`: the value plus the
//! version and commit timestamp of the write that produced it.

use super::{Timestamp, Version};
use serde::{Deserialize, Serialize};

/// A value with its version information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// The actual value
    pub value: T,

    /// Commit version that wrote the value
    pub version: Version,

    /// Commit timestamp of that version
    pub timestamp: Timestamp,
}

/// Raw stored bytes with version information
pub type VersionedBytes = Versioned<Vec<u8>>;

impl<T> Versioned<T> {
    /// Create a versioned value with an explicit timestamp
    pub fn new(value: T, version: Version, timestamp: Timestamp) -> Self {
        Versioned {
            value,
            version,
            timestamp,
        }
    }

    /// Map the inner value to a new type
    pub fn map<U, F>(self, f: F) -> Versioned<U>
    where
        F: FnOnce(T) -> U,
    {
        Versioned {
            value: f(self.value),
            version: self.version,
            timestamp: self.timestamp,
        }
    }

    /// Consume and return the inner value
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Split into (value, version, timestamp)
    pub fn into_parts(self) -> (T, Version, Timestamp) {
        (self.value, self.version, self.timestamp)
    }
}
