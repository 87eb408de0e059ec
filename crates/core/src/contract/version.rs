//! Commit version identifier
//!
//! Every committed transaction gets the next version from a single
//! monotonic counter. Version `0` never belongs to a committed write, so it
//! doubles as the "key was absent" marker in read sets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic commit version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Marker for "no committed value"
    pub const ZERO: Version = Version(0);

    /// Wrap a raw version number
    #[inline]
    pub const fn new(v: u64) -> Self {
        Version(v)
    }

    /// Raw version number
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Is this the absent marker?
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(v: u64) -> Self {
        Version(v)
    }
}

impl From<Version> for u64 {
    fn from(v: Version) -> Self {
        v.0
    }
}
