//! Cache Facade Module
//!
//! The public entry point: computes keys, encodes values and dispatches to
//! the configured storage strategy.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::backend::Backend;
use crate::cache::strategy::build_strategy;
use crate::cache::{
    bulk, Cacheable, Codec, EntryKey, Identifier, IndexName, JsonCodec, Namespace,
    StorageStrategy, StrategyKind, DEFAULT_TTL, LARGE_COLLECTION_THRESHOLD,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache Options ==
/// Behavior knobs fixed when the cache is built.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    pub strategy: StrategyKind,
    pub default_ttl: Duration,
    pub large_collection_threshold: u64,
    pub lenient_custom_key_decode: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::GroupedHash,
            default_ttl: DEFAULT_TTL,
            large_collection_threshold: LARGE_COLLECTION_THRESHOLD,
            lenient_custom_key_decode: true,
        }
    }
}

impl From<&Config> for CacheOptions {
    fn from(config: &Config) -> Self {
        Self {
            strategy: config.strategy,
            default_ttl: config.default_ttl,
            large_collection_threshold: config.large_collection_threshold,
            lenient_custom_key_decode: config.lenient_custom_key_decode,
        }
    }
}

// == Cache ==
/// Typed-object cache over a key-value backend.
///
/// Holds no entry data itself: every call round-trips to the backend.
/// Clones share the same backend connection.
#[derive(Clone)]
pub struct Cache<C: Codec = JsonCodec> {
    backend: Arc<dyn Backend>,
    strategy: Arc<dyn StorageStrategy>,
    codec: C,
    options: CacheOptions,
}

impl Cache<JsonCodec> {
    /// Builds a JSON-encoding cache on top of `backend`.
    pub fn new(backend: Arc<dyn Backend>, options: CacheOptions) -> Self {
        Self::with_codec(backend, options, JsonCodec)
    }
}

impl<C: Codec> Cache<C> {
    pub fn with_codec(backend: Arc<dyn Backend>, options: CacheOptions, codec: C) -> Self {
        let strategy = build_strategy(
            options.strategy,
            backend.clone(),
            options.default_ttl,
            options.large_collection_threshold,
        );
        Self {
            backend,
            strategy,
            codec,
            options,
        }
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Checks that the backend answers.
    pub async fn ping(&self) -> Result<()> {
        self.backend.ping().await
    }

    // == Key helpers ==

    fn identity_key<T: Cacheable>(value: &T) -> Result<EntryKey> {
        let tag = T::type_tag();
        let id = value
            .identifier()
            .ok_or_else(|| CacheError::IdentityUnresolved(tag.to_string()))?;
        Ok(EntryKey::member(Namespace::primary(&tag), id.as_str()))
    }

    fn id_key<T: Cacheable>(id: impl Into<Identifier>) -> EntryKey {
        let id: Identifier = id.into();
        EntryKey::member(Namespace::primary(&T::type_tag()), id.as_str())
    }

    fn index_namespace<T: Cacheable>(index: &str) -> Namespace {
        Namespace::secondary(&T::type_tag(), &IndexName::new(index))
    }

    fn custom_key<T: Cacheable>(index: &str, key_value: &str) -> EntryKey {
        EntryKey::member(Self::index_namespace::<T>(index), key_value)
    }

    async fn fetch_decoded<T: DeserializeOwned>(&self, key: &EntryKey) -> Result<Option<T>> {
        match self.strategy.fetch(key).await? {
            Some(payload) => Ok(Some(self.codec.decode(&payload)?)),
            None => Ok(None),
        }
    }

    async fn list_decoded<T: DeserializeOwned>(&self, namespace: &Namespace) -> Result<Vec<T>> {
        self.strategy
            .list_all(namespace)
            .await?
            .iter()
            .map(|payload| self.codec.decode(payload))
            .collect()
    }

    // == Store ==

    /// Stores `value` under its own identifier.
    pub async fn store_by_identity<T: Cacheable>(
        &self,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let key = Self::identity_key(value)?;
        let payload = self.codec.encode(value)?;
        self.strategy.store(&key, &payload, ttl).await
    }

    /// Stores `value` under `key_value` in the custom index `index`.
    pub async fn store_by_custom_key<T: Cacheable>(
        &self,
        value: &T,
        index: &str,
        key_value: &str,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let key = Self::custom_key::<T>(index, key_value);
        let payload = self.codec.encode(value)?;
        self.strategy.store(&key, &payload, ttl).await
    }

    /// Stores any value under a verbatim key.
    pub async fn store_raw<V: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &V,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let payload = self.codec.encode(value)?;
        self.strategy.store(&EntryKey::raw(key), &payload, ttl).await
    }

    // == Fetch ==

    pub async fn fetch_by_identity<T: Cacheable>(
        &self,
        id: impl Into<Identifier>,
    ) -> Result<Option<T>> {
        self.fetch_decoded(&Self::id_key::<T>(id)).await
    }

    /// Fetches from a custom index.
    ///
    /// With `lenient_custom_key_decode` on, an undecodable payload yields the
    /// value decoded from the codec's empty document (or `None` when the type
    /// cannot be built from it) instead of an error.
    pub async fn fetch_by_custom_key<T: Cacheable>(
        &self,
        index: &str,
        key_value: &str,
    ) -> Result<Option<T>> {
        let key = Self::custom_key::<T>(index, key_value);
        let Some(payload) = self.strategy.fetch(&key).await? else {
            return Ok(None);
        };

        match self.codec.decode(&payload) {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.options.lenient_custom_key_decode => {
                warn!(
                    key = %key.flattened(),
                    error = %err,
                    "undecodable custom-key payload, returning empty default"
                );
                Ok(self.codec.decode(self.codec.empty_document()).ok())
            }
            Err(err) => Err(err),
        }
    }

    pub async fn fetch_raw<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.fetch_decoded(&EntryKey::raw(key)).await
    }

    // == Remove ==

    /// Removes the entry stored under `value`'s identifier.
    pub async fn remove_by_identity<T: Cacheable>(&self, value: &T) -> Result<bool> {
        self.strategy.remove(&Self::identity_key(value)?).await
    }

    pub async fn remove_by_id<T: Cacheable>(&self, id: impl Into<Identifier>) -> Result<bool> {
        self.strategy.remove(&Self::id_key::<T>(id)).await
    }

    pub async fn remove_by_custom_key<T: Cacheable>(
        &self,
        index: &str,
        key_value: &str,
    ) -> Result<bool> {
        self.strategy
            .remove(&Self::custom_key::<T>(index, key_value))
            .await
    }

    pub async fn remove_raw(&self, key: &str) -> Result<bool> {
        self.strategy.remove(&EntryKey::raw(key)).await
    }

    // == Bulk removal ==

    /// Removes every `T` whose identifier is not in `keep_ids`.
    pub async fn remove_all_except_by_identity<T, I>(&self, keep_ids: I) -> Result<usize>
    where
        T: Cacheable,
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        let keep: HashSet<String> = keep_ids
            .into_iter()
            .map(|id| {
                let id: Identifier = id.into();
                id.as_str().to_string()
            })
            .collect();
        let namespace = Namespace::primary(&T::type_tag());
        bulk::remove_all_except(self.strategy.as_ref(), &namespace, &keep).await
    }

    /// Removes every entry of the custom index whose key is not in `keep_keys`.
    pub async fn remove_all_except_by_custom_key<T, I>(
        &self,
        index: &str,
        keep_keys: I,
    ) -> Result<usize>
    where
        T: Cacheable,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let keep: HashSet<String> = keep_keys.into_iter().map(Into::into).collect();
        let namespace = Self::index_namespace::<T>(index);
        bulk::remove_all_except(self.strategy.as_ref(), &namespace, &keep).await
    }

    pub async fn remove_all_by_identity<T: Cacheable>(&self) -> Result<usize> {
        self.strategy
            .remove_bucket(&Namespace::primary(&T::type_tag()))
            .await
    }

    pub async fn remove_all_by_custom_key<T: Cacheable>(&self, index: &str) -> Result<usize> {
        self.strategy
            .remove_bucket(&Self::index_namespace::<T>(index))
            .await
    }

    /// Empties an arbitrary bucket. The name is lowercased.
    pub async fn remove_bucket(&self, name: &str) -> Result<usize> {
        self.strategy.remove_bucket(&Namespace::named(name)).await
    }

    // == Count ==

    pub async fn count_by_identity<T: Cacheable>(&self) -> Result<u64> {
        self.strategy
            .count(&Namespace::primary(&T::type_tag()))
            .await
    }

    pub async fn count_by_custom_key<T: Cacheable>(&self, index: &str) -> Result<u64> {
        self.strategy
            .count(&Self::index_namespace::<T>(index))
            .await
    }

    pub async fn count_bucket(&self, name: &str) -> Result<u64> {
        self.strategy.count(&Namespace::named(name)).await
    }

    // == Enumeration ==

    pub async fn list_all_by_identity<T: Cacheable>(&self) -> Result<Vec<T>> {
        self.list_decoded(&Namespace::primary(&T::type_tag())).await
    }

    pub async fn list_all_by_custom_key<T: Cacheable>(&self, index: &str) -> Result<Vec<T>> {
        self.list_decoded(&Self::index_namespace::<T>(index)).await
    }

    pub async fn list_keys_by_identity<T: Cacheable>(&self) -> Result<Vec<String>> {
        self.strategy
            .list_members(&Namespace::primary(&T::type_tag()))
            .await
    }

    pub async fn list_keys_by_custom_key<T: Cacheable>(&self, index: &str) -> Result<Vec<String>> {
        self.strategy
            .list_members(&Self::index_namespace::<T>(index))
            .await
    }

    /// Member keys of an arbitrary bucket. The name is lowercased.
    pub async fn list_keys(&self, name: &str) -> Result<Vec<String>> {
        self.strategy.list_members(&Namespace::named(name)).await
    }
}
