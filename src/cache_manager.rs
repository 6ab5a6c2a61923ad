//! Content cache shared by the public content API and the admin editor
//!
//! Public reads populate it, admin writes invalidate it. Every key carries a
//! generation counter: invalidation bumps it, and a read that started before
//! the bump is not allowed to store its (possibly stale) result.

use crate::utils::cache::{Cache, CacheConfig, CacheResult, CacheStats, MemoryCache};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Query keys for the content the public site reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    SiteSetting(String),
    Services,
    GalleryItems,
    Testimonials,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::SiteSetting(section) => write!(f, "site_settings:{}", section),
            CacheKey::Services => f.write_str("services"),
            CacheKey::GalleryItems => f.write_str("gallery_items"),
            CacheKey::Testimonials => f.write_str("testimonials"),
        }
    }
}

pub struct CacheManager {
    content: MemoryCache,
    generations: Mutex<HashMap<String, u64>>,
}

impl CacheManager {
    pub fn new(ttl: Duration) -> Self {
        CacheManager {
            content: MemoryCache::new(CacheConfig {
                max_size: 256,
                default_ttl: Some(ttl),
            }),
            generations: Mutex::new(HashMap::new()),
        }
    }

    /// Cached value for `key`, or the result of `fetch` which is then cached.
    /// Errors from `fetch` are returned as-is and nothing is cached.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = key.to_string();

        if let Ok(Some(value)) = self.content.get::<T>(&key).await {
            return Ok(value);
        }

        let generation = self.generation(&key).await;
        let value = fetch().await?;

        let generations = self.generations.lock().await;
        if generations.get(&key).copied().unwrap_or(0) == generation {
            if let Err(e) = self.content.set(&key, &value, None).await {
                tracing::warn!("Failed to cache {}: {}", key, e);
            }
        } else {
            tracing::debug!("Skipping cache fill for {}, invalidated during fetch", key);
        }

        Ok(value)
    }

    /// Drops the cached copy of `key`. Call only after the write it follows
    /// has completed.
    pub async fn invalidate(&self, key: &CacheKey) {
        let key = key.to_string();
        let mut generations = self.generations.lock().await;
        *generations.entry(key.clone()).or_insert(0) += 1;
        if let Err(e) = self.content.delete(&key).await {
            tracing::warn!("Failed to invalidate {}: {}", key, e);
        }
        tracing::debug!("Invalidated cache key {}", key);
    }

    pub async fn clear_all(&self) -> CacheResult<()> {
        let mut generations = self.generations.lock().await;
        for generation in generations.values_mut() {
            *generation += 1;
        }
        self.content.clear().await?;
        tracing::info!("Cleared content cache");
        Ok(())
    }

    pub async fn get_stats(&self) -> CacheStats {
        self.content.stats().await
    }

    /// Start background cleanup of expired entries
    pub fn start_cleanup_task(self: &Arc<Self>) {
        let manager = Arc::clone(self);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                let cleaned = manager.content.cleanup_expired().await;
                if cleaned > 0 {
                    tracing::info!("Cleaned up {} expired cache entries", cleaned);
                }
            }
        });
    }

    async fn generation(&self, key: &str) -> u64 {
        self.generations
            .lock()
            .await
            .get(key)
            .copied()
            .unwrap_or(0)
    }
}
