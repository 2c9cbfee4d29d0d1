use crate::domain::model::PackagingBox;
use crate::domain::ports::ResultCache;
use crate::utils::error::Result;
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone)]
struct CachedBox {
    packaging: PackagingBox,
    ttl: Duration,
}

/// Each entry lives for the TTL it was written with; a rewrite restarts it.
struct PerEntryTtl;

impl Expiry<String, CachedBox> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedBox,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedBox,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Process-local TTL cache, bounded by entry count.
#[derive(Clone)]
pub struct InMemoryCache {
    entries: Cache<String, CachedBox>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .eviction_listener(|key, _value, cause| {
                tracing::debug!("Cache entry {} evicted ({:?})", key, cause);
            })
            .build();
        Self { entries }
    }

    /// Live entries after pending expirations and evictions are applied.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<PackagingBox>> {
        Ok(self.entries.get(key).await.map(|entry| entry.packaging))
    }

    async fn set(&self, key: &str, value: &PackagingBox, ttl: Duration) -> Result<()> {
        let entry = CachedBox {
            packaging: value.clone(),
            ttl,
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_before_expiry() {
        let cache = InMemoryCache::new();
        let packaging = PackagingBox::new(1, 10.0, 10.0, 10.0, 20.0);

        cache.set("k", &packaging, Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(packaging));
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = InMemoryCache::new();
        let packaging = PackagingBox::new(1, 10.0, 10.0, 10.0, 20.0);

        cache.set("k", &packaging, Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let cache = InMemoryCache::new();
        let first = PackagingBox::new(1, 10.0, 10.0, 10.0, 20.0);
        let second = PackagingBox::new(2, 10.0, 10.0, 10.0, 50.0);

        cache.set("k", &first, Duration::from_secs(60)).await.unwrap();
        cache.set("k", &second, Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_expired_entries_are_released() {
        let cache = InMemoryCache::new();
        let packaging = PackagingBox::new(1, 10.0, 10.0, 10.0, 20.0);

        for i in 0..1000 {
            cache
                .set(&format!("packing_{}", i), &packaging, Duration::from_millis(1))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.set("fresh", &packaging, Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_capacity_bounds_entry_count() {
        let cache = InMemoryCache::with_capacity(10);
        let packaging = PackagingBox::new(1, 10.0, 10.0, 10.0, 20.0);

        for i in 0..100 {
            cache
                .set(&format!("packing_{}", i), &packaging, Duration::from_secs(60))
                .await
                .unwrap();
        }

        assert!(cache.entry_count().await <= 10);
    }
}
