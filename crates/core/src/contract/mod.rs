//! Contract types shared by every layer
//!
//! - `timestamp`: microsecond commit timestamps and their calendar form
//! - `version`: monotonic commit versions
//! - `versioned`: value + version + timestamp wrapper

pub mod timestamp;
pub mod version;
pub mod versioned;

pub use timestamp::Timestamp;
pub use version::Version;
pub use versioned::{Versioned, VersionedBytes};
