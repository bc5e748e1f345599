//! Storage Strategy Module
//!
//! The two physical layouts typed entries can be written in.
//!
//! - Keyed-String: one string key per entry, with per-key TTL, no enumeration.
//! - Grouped-Hash: one hash bucket per namespace, enumerable, no per-entry TTL.
//!
//! Raw keys are plain string keys under either layout.

mod grouped;
mod keyed;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::Backend;
use crate::cache::{EntryKey, Namespace};
use crate::error::{CacheError, Result};

pub use grouped::GroupedHashStrategy;
pub use keyed::KeyedStringStrategy;

// == Strategy Kind ==
/// Which layout a deployment uses, selected once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    KeyedString,
    GroupedHash,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::KeyedString => "keyed-string",
            StrategyKind::GroupedHash => "grouped-hash",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "keyed-string" | "string" => Ok(StrategyKind::KeyedString),
            "grouped-hash" | "hash" => Ok(StrategyKind::GroupedHash),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown storage strategy '{}'",
                other
            ))),
        }
    }
}

// == Storage Strategy Trait ==
/// Operation set shared by both layouts. Payloads are already encoded.
///
/// Bucket operations (`remove_bucket`, `count`, `list_members`, `list_all`)
/// fail with `UnsupportedOperation` on layouts that cannot enumerate.
#[async_trait]
pub trait StorageStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Writes one entry. `ttl` falls back to the default TTL where the
    /// layout supports expiration and is ignored where it does not.
    async fn store(&self, key: &EntryKey, payload: &str, ttl: Option<Duration>) -> Result<()>;

    async fn fetch(&self, key: &EntryKey) -> Result<Option<String>>;

    /// Deletes one entry. Returns whether it existed.
    async fn remove(&self, key: &EntryKey) -> Result<bool>;

    /// Deletes every member of a namespace. Returns the number deleted.
    async fn remove_bucket(&self, namespace: &Namespace) -> Result<usize>;

    async fn count(&self, namespace: &Namespace) -> Result<u64>;

    async fn list_members(&self, namespace: &Namespace) -> Result<Vec<String>>;

    /// Every payload in a namespace.
    async fn list_all(&self, namespace: &Namespace) -> Result<Vec<String>>;
}

/// Builds the strategy for `kind` on top of `backend`.
pub fn build_strategy(
    kind: StrategyKind,
    backend: Arc<dyn Backend>,
    default_ttl: Duration,
    large_collection_threshold: u64,
) -> Arc<dyn StorageStrategy> {
    match kind {
        StrategyKind::KeyedString => Arc::new(KeyedStringStrategy::new(backend, default_ttl)),
        StrategyKind::GroupedHash => Arc::new(GroupedHashStrategy::new(
            backend,
            default_ttl,
            large_collection_threshold,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!(
            "keyed-string".parse::<StrategyKind>().unwrap(),
            StrategyKind::KeyedString
        );
        assert_eq!(
            "Grouped_Hash".parse::<StrategyKind>().unwrap(),
            StrategyKind::GroupedHash
        );
        assert!(matches!(
            "segmented".parse::<StrategyKind>(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_strategy_kind_display_round_trips() {
        for kind in [StrategyKind::KeyedString, StrategyKind::GroupedHash] {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }
}
