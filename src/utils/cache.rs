//! In-memory caching utilities
//!
//! Values are stored serialized so a single cache can hold every content
//! shape the public API serves. Entries carry an optional TTL and the cache
//! evicts the least recently accessed entry once it is full.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),
}

/// Cache entry with metadata
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: Option<DateTime<Utc>>,
    pub access_count: u64,
    pub last_accessed: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, ttl: Option<Duration>) -> CacheResult<Self> {
        let now = Utc::now();
        let expires_at = match ttl {
            Some(ttl) => Some(
                now + chrono::Duration::from_std(ttl)
                    .map_err(|e| CacheError::InvalidTtl(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            value,
            expires_at,
            access_count: 0,
            last_accessed: now,
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |exp| Utc::now() > exp)
    }

    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_accessed = Utc::now();
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
    pub size: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Configuration for cache behavior
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in cache
    pub max_size: usize,
    /// Default TTL for entries
    pub default_ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 256,
            default_ttl: Some(Duration::from_secs(300)),
        }
    }
}

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get<V>(&self, key: &str) -> CacheResult<Option<V>>
    where
        V: DeserializeOwned + Send;

    /// `ttl` overrides the configured default when given.
    async fn set<V>(&self, key: &str, value: &V, ttl: Option<Duration>) -> CacheResult<()>
    where
        V: Serialize + Send + Sync;

    async fn delete(&self, key: &str) -> CacheResult<bool>;

    async fn clear(&self) -> CacheResult<()>;

    async fn stats(&self) -> CacheStats;
}

/// In-memory cache with TTL support
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry<Vec<u8>>>>,
    config: CacheConfig,
    stats: RwLock<CacheStats>,
}

impl MemoryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Clean up expired entries
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let count = before - entries.len();

        self.stats.write().await.evictions += count as u64;
        count
    }

    #[cfg(test)]
    pub async fn size(&self) -> usize {
        self.entries.read().await.len()
    }

    fn evict_lru(&self, entries: &mut HashMap<String, CacheEntry<Vec<u8>>>) -> Option<String> {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone())?;
        entries.remove(&oldest);
        Some(oldest)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get<V>(&self, key: &str) -> CacheResult<Option<V>>
    where
        V: DeserializeOwned + Send,
    {
        let mut entries = self.entries.write().await;
        let mut stats = self.stats.write().await;

        let expired = match entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                stats.misses += 1;
                return Ok(None);
            }
        };
        if expired {
            entries.remove(key);
            stats.misses += 1;
            return Ok(None);
        }

        let bytes = match entries.get_mut(key) {
            Some(entry) => {
                entry.touch();
                entry.value.clone()
            }
            None => return Ok(None),
        };
        stats.hits += 1;
        drop(stats);
        drop(entries);

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // Shape changed under the same key; drop the stale entry
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                self.entries.write().await.remove(key);
                Ok(None)
            }
        }
    }

    async fn set<V>(&self, key: &str, value: &V, ttl: Option<Duration>) -> CacheResult<()>
    where
        V: Serialize + Send + Sync,
    {
        let bytes = serde_json::to_vec(value)?;
        let entry = CacheEntry::new(bytes, ttl.or(self.config.default_ttl))?;

        let mut entries = self.entries.write().await;
        let mut stats = self.stats.write().await;

        if !entries.contains_key(key) && entries.len() >= self.config.max_size {
            if let Some(evicted) = self.evict_lru(&mut entries) {
                debug!("Evicted cache entry {}", evicted);
                stats.evictions += 1;
            }
        }

        entries.insert(key.to_string(), entry);
        stats.sets += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let removed = self.entries.write().await.remove(key).is_some();
        if removed {
            self.stats.write().await.deletes += 1;
        }
        Ok(removed)
    }

    async fn clear(&self) -> CacheResult<()> {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        self.stats.write().await.deletes += count as u64;
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        let mut stats = self.stats.read().await.clone();
        stats.size = self.entries.read().await.len();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new(CacheConfig::default());

        cache.set("greeting", &"hello".to_string(), None).await.unwrap();
        let value: Option<String> = cache.get("greeting").await.unwrap();
        assert_eq!(value.as_deref(), Some("hello"));

        assert!(cache.delete("greeting").await.unwrap());
        let value: Option<String> = cache.get("greeting").await.unwrap();
        assert_eq!(value, None);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.deletes, 1);
    }

    #[tokio::test]
    async fn test_expired_entries_miss() {
        let cache = MemoryCache::new(CacheConfig::default());
        cache
            .set("short", &1u32, Some(Duration::from_millis(10)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let value: Option<u32> = cache.get("short").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let cache = MemoryCache::new(CacheConfig::default());
        cache
            .set("a", &1u32, Some(Duration::from_millis(10)))
            .await
            .unwrap();
        cache.set("b", &2u32, None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.cleanup_expired().await, 1);
        assert_eq!(cache.size().await, 1);
    }

    #[tokio::test]
    async fn test_full_cache_evicts_least_recent() {
        let cache = MemoryCache::new(CacheConfig {
            max_size: 2,
            default_ttl: None,
        });
        cache.set("a", &1u32, None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.set("b", &2u32, None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let _: Option<u32> = cache.get("a").await.unwrap();

        cache.set("c", &3u32, None).await.unwrap();

        let b: Option<u32> = cache.get("b").await.unwrap();
        let a: Option<u32> = cache.get("a").await.unwrap();
        assert_eq!(b, None);
        assert_eq!(a, Some(1));
        assert_eq!(cache.stats().await.evictions, 1);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_a_miss() {
        let cache = MemoryCache::new(CacheConfig::default());
        cache.set("n", &"not a number", None).await.unwrap();
        let value: Option<u32> = cache.get("n").await.unwrap();
        assert_eq!(value, None);
        assert_eq!(cache.size().await, 0);
    }
}
