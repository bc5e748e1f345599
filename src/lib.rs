//! Typed Cache - a typed-object cache facade over key-value backends
//!
//! Stores, fetches, enumerates and evicts domain objects by identity, by
//! custom index or by raw key, in either a per-key or a grouped-hash layout.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use backend::{Backend, BackendHandle, MemoryBackend, RedisBackend};
pub use cache::{Cache, CacheOptions, Cacheable, Identifier, StrategyKind};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
