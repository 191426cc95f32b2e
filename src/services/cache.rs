use crate::models::FilterQuery;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-tier cache for scrape results
///
/// L1 is in-process and always present; L2 (Redis) is shared across
/// instances when configured.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a cache manager, connecting to Redis when a URL is given
    pub async fn new(redis_url: Option<&str>, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let redis = match redis_url {
            Some(url) => {
                let client = redis::Client::open(url)?;
                let manager = ConnectionManager::new(client).await?;
                Some(Arc::new(tokio::sync::Mutex::new(manager)))
            }
            None => None,
        };

        Ok(Self {
            redis,
            l1_cache: Self::l1(l1_size, ttl_secs),
            ttl_secs,
        })
    }

    /// In-process cache only
    pub fn local(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            redis: None,
            l1_cache: Self::l1(l1_size, ttl_secs),
            ttl_secs,
        }
    }

    fn l1(size: u64, ttl_secs: u64) -> moka::future::Cache<String, Vec<u8>> {
        moka::future::CacheBuilder::new(size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build()
    }

    pub fn has_l2(&self) -> bool {
        self.redis.is_some()
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let value: Option<String> = redis::cmd("GET")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
            drop(conn);

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);
                self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;
                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in every tier
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;
        self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from every tier
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;
        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("DEL")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Redis round trip; true when running without L2
    pub async fn health_check(&self) -> bool {
        let Some(redis) = &self.redis else {
            return true;
        };
        let mut conn = redis.lock().await;
        let pong: Result<String, redis::RedisError> = redis::cmd("PING").query_async(&mut *conn).await;
        pong.is_ok()
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for one store's results under a filter
    pub fn filter(query: &FilterQuery) -> String {
        format!("filter:{}:{}", query.store, query.filter_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_set_get_delete() {
        let cache = CacheManager::local(16, 60);
        assert!(!cache.has_l2());

        cache.set("k", &vec!["a".to_string()]).await.unwrap();
        let value: Vec<String> = cache.get("k").await.unwrap();
        assert_eq!(value, vec!["a"]);

        cache.delete("k").await.unwrap();
        assert!(matches!(cache.get::<Vec<String>>("k").await, Err(CacheError::CacheMiss(_))));
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_redis_round_trip() {
        let cache = CacheManager::new(Some("redis://127.0.0.1:6379"), 16, 60)
            .await
            .expect("Failed to create cache");
        assert!(cache.health_check().await);

        cache.set("shoe-scout:test", &"value").await.unwrap();
        let result: String = cache.get("shoe-scout:test").await.unwrap();
        assert_eq!(result, "value");
        cache.delete("shoe-scout:test").await.unwrap();
    }

    #[test]
    fn test_filter_key_includes_store() {
        let query = FilterQuery {
            search_size: "23".to_string(),
            search_cat: "148".to_string(),
            store: "daf".to_string(),
            ..Default::default()
        };
        assert_eq!(
            CacheKey::filter(&query),
            "filter:daf:orderby=&searchSize=23&searchColor=&searchHeel=&searchCat=148"
        );
    }
}
