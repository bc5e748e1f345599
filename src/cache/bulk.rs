//! Bulk Operations Module
//!
//! Exceptive eviction composed from strategy primitives.
//!
//! Nothing here is transactional. Membership may change between enumeration
//! and deletion, and a failure partway through leaves earlier deletions applied.

use std::collections::HashSet;

use tracing::info;

use crate::cache::{EntryKey, Namespace, StorageStrategy};
use crate::error::Result;

/// Members of a bucket that are not in `keep`, in enumeration order.
pub fn members_to_remove(members: Vec<String>, keep: &HashSet<String>) -> Vec<String> {
    members
        .into_iter()
        .filter(|member| !keep.contains(member))
        .collect()
}

/// Deletes every member of `namespace` not listed in `keep`.
///
/// Returns the number of members actually deleted.
pub async fn remove_all_except(
    strategy: &dyn StorageStrategy,
    namespace: &Namespace,
    keep: &HashSet<String>,
) -> Result<usize> {
    let members = strategy.list_members(namespace).await?;
    let doomed = members_to_remove(members, keep);

    let mut removed = 0;
    for member in doomed {
        if strategy
            .remove(&EntryKey::member(namespace.clone(), member))
            .await?
        {
            removed += 1;
        }
    }

    info!(bucket = %namespace, kept = keep.len(), removed, "bucket pruned");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::cache::{GroupedHashStrategy, KeyedStringStrategy, TypeTag};
    use crate::error::CacheError;
    use std::sync::Arc;
    use std::time::Duration;

    fn keep(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_members_to_remove_is_set_difference() {
        let members = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        assert_eq!(members_to_remove(members, &keep(&["2", "9"])), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_remove_all_except_grouped() {
        let backend = Arc::new(MemoryBackend::new());
        let strategy = GroupedHashStrategy::new(backend, Duration::from_secs(60), 100);
        let ns = Namespace::primary(&TypeTag::new("person"));

        for id in ["1", "2", "3", "4"] {
            strategy
                .store(&EntryKey::member(ns.clone(), id), id, None)
                .await
                .unwrap();
        }

        let removed = remove_all_except(&strategy, &ns, &keep(&["2", "4", "5"]))
            .await
            .unwrap();

        assert_eq!(removed, 2);
        let mut left = strategy.list_members(&ns).await.unwrap();
        left.sort();
        assert_eq!(left, vec!["2", "4"]);
    }

    #[tokio::test]
    async fn test_remove_all_except_keyed_unsupported() {
        let backend = Arc::new(MemoryBackend::new());
        let strategy = KeyedStringStrategy::new(backend, Duration::from_secs(60));
        let ns = Namespace::primary(&TypeTag::new("person"));

        let result = remove_all_except(&strategy, &ns, &keep(&[])).await;
        assert!(matches!(result, Err(CacheError::UnsupportedOperation { .. })));
    }
}
