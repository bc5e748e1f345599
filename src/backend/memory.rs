//! Memory Backend Module
//!
//! In-process key-value engine with string and hash values and TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::{Backend, MemoryEntry, StoredValue};
use crate::error::{CacheError, Result};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

// == Memory Backend ==
/// Key-value storage mirroring the subset of Redis semantics the cache uses.
///
/// Expired keys are dropped lazily on access and by [`MemoryBackend::cleanup_expired`].
/// A hash bucket disappears once its last field is deleted.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryBackend {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of keys currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Returns the live entry for `key`, dropping it first if it has expired.
fn live<'a>(
    entries: &'a mut HashMap<String, MemoryEntry>,
    key: &str,
) -> Option<&'a mut MemoryEntry> {
    if entries.get(key).is_some_and(MemoryEntry::is_expired) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

/// Borrows the hash stored at `bucket`, if any.
fn live_hash<'a>(
    entries: &'a mut HashMap<String, MemoryEntry>,
    bucket: &str,
) -> Result<Option<&'a mut HashMap<String, String>>> {
    match live(entries, bucket) {
        None => Ok(None),
        Some(MemoryEntry {
            value: StoredValue::Hash(fields),
            ..
        }) => Ok(Some(fields)),
        Some(_) => Err(CacheError::BackendUnavailable(WRONG_TYPE.to_string())),
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn string_set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let entry = MemoryEntry::new(StoredValue::Text(value.to_string()), ttl);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn string_get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            None => Ok(None),
            Some(MemoryEntry {
                value: StoredValue::Text(text),
                ..
            }) => Ok(Some(text.clone())),
            Some(_) => Err(CacheError::BackendUnavailable(WRONG_TYPE.to_string())),
        }
    }

    async fn key_delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(matches!(entries.remove(key), Some(entry) if !entry.is_expired()))
    }

    async fn hash_set(&self, bucket: &str, field: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        if live(&mut entries, bucket).is_none() {
            entries.insert(bucket.to_string(), MemoryEntry::bucket());
        }
        if let Some(fields) = live_hash(&mut entries, bucket)? {
            fields.insert(field.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn hash_get(&self, bucket: &str, field: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        Ok(live_hash(&mut entries, bucket)?.and_then(|fields| fields.get(field).cloned()))
    }

    async fn hash_delete(&self, bucket: &str, field: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let (removed, now_empty) = match live_hash(&mut entries, bucket)? {
            None => return Ok(false),
            Some(fields) => (fields.remove(field).is_some(), fields.is_empty()),
        };
        if now_empty {
            entries.remove(bucket);
        }
        Ok(removed)
    }

    async fn hash_keys(&self, bucket: &str) -> Result<Vec<String>> {
        let mut entries = self.entries.write().await;
        Ok(live_hash(&mut entries, bucket)?
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn hash_get_all(&self, bucket: &str) -> Result<Vec<(String, String)>> {
        let mut entries = self.entries.write().await;
        Ok(live_hash(&mut entries, bucket)?
            .map(|fields| {
                fields
                    .iter()
                    .map(|(field, value)| (field.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn hash_length(&self, bucket: &str) -> Result<u64> {
        let mut entries = self.entries.write().await;
        Ok(live_hash(&mut entries, bucket)?
            .map(|fields| fields.len() as u64)
            .unwrap_or(0))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
