//! Grouped-Hash Strategy
//!
//! One hash bucket per namespace; each entry is a field of its bucket.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::backend::Backend;
use crate::cache::strategy::{StorageStrategy, StrategyKind};
use crate::cache::{EntryKey, Namespace};
use crate::error::Result;

/// Bucketed layout. Hash fields carry no TTL, so `ttl` only applies to raw keys.
pub struct GroupedHashStrategy {
    backend: Arc<dyn Backend>,
    default_ttl: Duration,
    large_collection_threshold: u64,
}

impl GroupedHashStrategy {
    pub fn new(
        backend: Arc<dyn Backend>,
        default_ttl: Duration,
        large_collection_threshold: u64,
    ) -> Self {
        Self {
            backend,
            default_ttl,
            large_collection_threshold,
        }
    }

    // Reads members one at a time to bound response size. Members deleted
    // after enumeration are skipped.
    async fn list_all_per_key(&self, namespace: &Namespace) -> Result<Vec<String>> {
        let bucket = namespace.as_str();
        let fields = self.backend.hash_keys(bucket).await?;
        let mut payloads = Vec::with_capacity(fields.len());
        for field in fields {
            if let Some(payload) = self.backend.hash_get(bucket, &field).await? {
                payloads.push(payload);
            }
        }
        Ok(payloads)
    }
}

#[async_trait]
impl StorageStrategy for GroupedHashStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::GroupedHash
    }

    async fn store(&self, key: &EntryKey, payload: &str, ttl: Option<Duration>) -> Result<()> {
        match key {
            EntryKey::Member { namespace, member } => {
                debug!(bucket = %namespace, field = %member, "hash store");
                self.backend
                    .hash_set(namespace.as_str(), member, payload)
                    .await
            }
            EntryKey::Raw(raw) => {
                let ttl = ttl.unwrap_or(self.default_ttl);
                debug!(key = %raw, "raw store");
                self.backend.string_set(raw, payload, Some(ttl)).await
            }
        }
    }

    async fn fetch(&self, key: &EntryKey) -> Result<Option<String>> {
        let payload = match key {
            EntryKey::Member { namespace, member } => {
                debug!(bucket = %namespace, field = %member, "hash fetch");
                self.backend.hash_get(namespace.as_str(), member).await?
            }
            EntryKey::Raw(raw) => self.backend.string_get(raw).await?,
        };
        Ok(payload.filter(|p| !p.is_empty()))
    }

    async fn remove(&self, key: &EntryKey) -> Result<bool> {
        match key {
            EntryKey::Member { namespace, member } => {
                debug!(bucket = %namespace, field = %member, "hash remove");
                self.backend.hash_delete(namespace.as_str(), member).await
            }
            EntryKey::Raw(raw) => self.backend.key_delete(raw).await,
        }
    }

    async fn remove_bucket(&self, namespace: &Namespace) -> Result<usize> {
        let bucket = namespace.as_str();
        let fields = self.backend.hash_keys(bucket).await?;
        let mut removed = 0;
        for field in &fields {
            if self.backend.hash_delete(bucket, field).await? {
                removed += 1;
            }
        }
        info!(bucket = %namespace, removed, "bucket cleared");
        Ok(removed)
    }

    async fn count(&self, namespace: &Namespace) -> Result<u64> {
        self.backend.hash_length(namespace.as_str()).await
    }

    async fn list_members(&self, namespace: &Namespace) -> Result<Vec<String>> {
        self.backend.hash_keys(namespace.as_str()).await
    }

    async fn list_all(&self, namespace: &Namespace) -> Result<Vec<String>> {
        let size = self.backend.hash_length(namespace.as_str()).await?;
        if size > self.large_collection_threshold {
            debug!(bucket = %namespace, size, "bucket above threshold, reading per key");
            return self.list_all_per_key(namespace).await;
        }

        let all = self.backend.hash_get_all(namespace.as_str()).await?;
        Ok(all.into_iter().map(|(_, payload)| payload).collect())
    }
}
