//! Memory Entry Module
//!
//! Defines the structure for values held by the memory backend, with TTL support.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Stored Value ==
/// The two value shapes a key can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Text(String),
    Hash(HashMap<String, String>),
}

// == Memory Entry ==
/// Represents a single backend key with its value and metadata.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    /// The stored value
    pub value: StoredValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl MemoryEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    pub fn new(value: StoredValue, ttl: Option<Duration>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl.map(|ttl| now.saturating_add(duration_ms(ttl)));

        Self { value, expires_at }
    }

    /// Creates an empty hash bucket, which never expires.
    pub fn bucket() -> Self {
        Self::new(StoredValue::Hash(HashMap::new()), None)
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(duration_ms)
        .unwrap_or(0)
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
