//! Cache Module
//!
//! Typed-object caching over a key-value backend: identifier resolution,
//! key naming, encoding, storage layouts and the facade tying them together.

pub mod bulk;
mod codec;
mod facade;
mod identity;
mod keys;
mod strategy;


use std::time::Duration;

// Re-export public types
pub use codec::{Codec, JsonCodec};
pub use facade::{Cache, CacheOptions};
pub use identity::{resolve_from_fields, resolve_identifier, Cacheable, Identifier};
pub use keys::{EntryKey, IndexName, Namespace, TypeTag};
pub use strategy::{
    build_strategy, GroupedHashStrategy, KeyedStringStrategy, StorageStrategy, StrategyKind,
};

// == Public Constants ==
/// TTL for string keys stored without one: 365 days
pub const DEFAULT_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Bucket size above which `list_all` reads members one by one
pub const LARGE_COLLECTION_THRESHOLD: u64 = 65_000;
