//! Backend Module
//!
//! The key-value primitives the cache facade is built on, plus the two
//! backends shipped with the crate.

mod entry;
mod memory;
mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

pub use entry::{MemoryEntry, StoredValue};
pub use memory::MemoryBackend;
pub use self::redis::RedisBackend;

// == Backend Trait ==
/// Primitive operations any key-value engine must offer to back the cache.
///
/// Missing keys and fields are `Ok(None)` / `Ok(false)`, never errors.
#[async_trait]
pub trait Backend: Send + Sync {
    /// A name for logs and health checks, e.g. "memory" or "redis".
    fn name(&self) -> &'static str;

    async fn string_set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    async fn string_get(&self, key: &str) -> Result<Option<String>>;

    /// Deletes a key of any type. Returns whether it existed.
    async fn key_delete(&self, key: &str) -> Result<bool>;

    async fn hash_set(&self, bucket: &str, field: &str, value: &str) -> Result<()>;

    async fn hash_get(&self, bucket: &str, field: &str) -> Result<Option<String>>;

    /// Deletes one field. Returns whether it existed.
    async fn hash_delete(&self, bucket: &str, field: &str) -> Result<bool>;

    async fn hash_keys(&self, bucket: &str) -> Result<Vec<String>>;

    async fn hash_get_all(&self, bucket: &str) -> Result<Vec<(String, String)>>;

    async fn hash_length(&self, bucket: &str) -> Result<u64>;

    /// Round trip used by health checks.
    async fn ping(&self) -> Result<()>;
}

// == Backend Handle ==
/// A connected backend, keeping the concrete type around for callers that
/// need it (the memory sweep task).
#[derive(Clone)]
pub enum BackendHandle {
    Memory(Arc<MemoryBackend>),
    Redis(Arc<RedisBackend>),
}

impl BackendHandle {
    /// Connects to the backend named by `url`.
    ///
    /// `memory://` builds an in-process backend; `redis://` and `rediss://`
    /// open a managed Redis connection.
    pub async fn connect(url: &str) -> Result<Self> {
        if url.starts_with("memory://") {
            return Ok(BackendHandle::Memory(Arc::new(MemoryBackend::new())));
        }
        if url.starts_with("redis://") || url.starts_with("rediss://") {
            let backend = RedisBackend::connect(url).await?;
            return Ok(BackendHandle::Redis(Arc::new(backend)));
        }
        Err(CacheError::InvalidConfig(format!(
            "unsupported backend url '{}'",
            url
        )))
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        match self {
            BackendHandle::Memory(memory) => memory.clone(),
            BackendHandle::Redis(redis) => redis.clone(),
        }
    }

    pub fn memory(&self) -> Option<Arc<MemoryBackend>> {
        match self {
            BackendHandle::Memory(memory) => Some(memory.clone()),
            BackendHandle::Redis(_) => None,
        }
    }
}
