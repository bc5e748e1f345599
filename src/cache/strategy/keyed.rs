//! Keyed-String Strategy
//!
//! One physical string key per entry (`namespace:member`), each with its own TTL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::backend::Backend;
use crate::cache::strategy::{StorageStrategy, StrategyKind};
use crate::cache::{EntryKey, Namespace};
use crate::error::{CacheError, Result};

/// Per-key layout. No index of keys is kept, so bucket operations are unsupported.
pub struct KeyedStringStrategy {
    backend: Arc<dyn Backend>,
    default_ttl: Duration,
}

impl KeyedStringStrategy {
    pub fn new(backend: Arc<dyn Backend>, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    fn unsupported<T>(operation: &'static str) -> Result<T> {
        Err(CacheError::UnsupportedOperation {
            operation,
            strategy: StrategyKind::KeyedString.as_str(),
        })
    }
}

#[async_trait]
impl StorageStrategy for KeyedStringStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::KeyedString
    }

    async fn store(&self, key: &EntryKey, payload: &str, ttl: Option<Duration>) -> Result<()> {
        let physical = key.flattened();
        let ttl = ttl.unwrap_or(self.default_ttl);
        debug!(key = %physical, ttl_ms = ttl.as_millis() as u64, "string store");
        self.backend.string_set(&physical, payload, Some(ttl)).await
    }

    async fn fetch(&self, key: &EntryKey) -> Result<Option<String>> {
        let physical = key.flattened();
        debug!(key = %physical, "string fetch");
        let payload = self.backend.string_get(&physical).await?;
        Ok(payload.filter(|p| !p.is_empty()))
    }

    async fn remove(&self, key: &EntryKey) -> Result<bool> {
        let physical = key.flattened();
        debug!(key = %physical, "string remove");
        self.backend.key_delete(&physical).await
    }

    async fn remove_bucket(&self, _namespace: &Namespace) -> Result<usize> {
        Self::unsupported("remove_bucket")
    }

    async fn count(&self, _namespace: &Namespace) -> Result<u64> {
        Self::unsupported("count")
    }

    async fn list_members(&self, _namespace: &Namespace) -> Result<Vec<String>> {
        Self::unsupported("list_members")
    }

    async fn list_all(&self, _namespace: &Namespace) -> Result<Vec<String>> {
        Self::unsupported("list_all")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::cache::TypeTag;

    fn setup() -> (Arc<MemoryBackend>, KeyedStringStrategy) {
        let backend = Arc::new(MemoryBackend::new());
        let strategy = KeyedStringStrategy::new(backend.clone(), Duration::from_secs(60));
        (backend, strategy)
    }

    fn person_key(id: &str) -> EntryKey {
        EntryKey::member(Namespace::primary(&TypeTag::new("Person")), id)
    }

    #[tokio::test]
    async fn test_store_writes_flattened_key() {
        let (backend, strategy) = setup();

        strategy.store(&person_key("7"), "{}", None).await.unwrap();

        assert_eq!(
            backend.string_get("person:7").await.unwrap().as_deref(),
            Some("{}")
        );
    }

    #[tokio::test]
    async fn test_fetch_and_remove() {
        let (_backend, strategy) = setup();
        let key = person_key("7");

        strategy.store(&key, r#"{"id":7}"#, None).await.unwrap();
        assert_eq!(
            strategy.fetch(&key).await.unwrap().as_deref(),
            Some(r#"{"id":7}"#)
        );

        assert!(strategy.remove(&key).await.unwrap());
        assert_eq!(strategy.fetch(&key).await.unwrap(), None);
        assert!(!strategy.remove(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_explicit_ttl_expires() {
        let (_backend, strategy) = setup();
        let key = person_key("1");

        strategy
            .store(&key, "payload", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(strategy.fetch(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(strategy.fetch(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_payload_is_absent() {
        let (backend, strategy) = setup();
        backend.string_set("person:1", "", None).await.unwrap();

        assert_eq!(strategy.fetch(&person_key("1")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bucket_operations_unsupported() {
        let (_backend, strategy) = setup();
        let ns = Namespace::named("person");

        assert!(matches!(
            strategy.count(&ns).await,
            Err(CacheError::UnsupportedOperation { operation: "count", .. })
        ));
        assert!(matches!(
            strategy.remove_bucket(&ns).await,
            Err(CacheError::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            strategy.list_members(&ns).await,
            Err(CacheError::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            strategy.list_all(&ns).await,
            Err(CacheError::UnsupportedOperation { .. })
        ));
    }
}
