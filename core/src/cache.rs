//! Named key/value stores for buffer fetches.
//!
//! # Design
//! The cache is an injected capability: `NetApi` only opens a bucket by name,
//! looks up a URL and stores a raw `HttpResponse` under it. Expiry and
//! eviction belong to the store. There is no locking across lookup and put,
//! so concurrent fetches of one URL may both miss and both write; the last
//! write wins.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::CacheError;
use crate::http::HttpResponse;

/// A store of named buckets.
pub trait CacheStore: Send + Sync {
    type Bucket: CacheBucket;

    fn open(&self, name: &str) -> impl Future<Output = Result<Self::Bucket, CacheError>> + Send;
}

/// One named bucket, keyed by resolved URL.
pub trait CacheBucket: Send + Sync {
    fn lookup(&self, key: &str) -> impl Future<Output = Result<Option<HttpResponse>, CacheError>> + Send;

    fn put(&self, key: &str, response: HttpResponse) -> impl Future<Output = Result<(), CacheError>> + Send;
}

impl<S: CacheStore> CacheStore for Arc<S> {
    type Bucket = S::Bucket;

    fn open(&self, name: &str) -> impl Future<Output = Result<Self::Bucket, CacheError>> + Send {
        (**self).open(name)
    }
}

/// Store that is never available. Buffer fetches through it always go to the
/// network and never write.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

/// Bucket type of `NoCache`; never constructed.
#[derive(Debug)]
pub enum NoBucket {}

impl CacheStore for NoCache {
    type Bucket = NoBucket;

    async fn open(&self, _name: &str) -> Result<Self::Bucket, CacheError> {
        Err(CacheError::Unavailable("no cache configured".to_string()))
    }
}

impl CacheBucket for NoBucket {
    async fn lookup(&self, _key: &str) -> Result<Option<HttpResponse>, CacheError> {
        match *self {}
    }

    async fn put(&self, _key: &str, _response: HttpResponse) -> Result<(), CacheError> {
        match *self {}
    }
}

type Entries = Arc<RwLock<HashMap<String, HttpResponse>>>;

/// In-process store with no expiry. Buckets opened under the same name share
/// their entries; clones of the store share every bucket.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    buckets: Arc<RwLock<HashMap<String, Entries>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in bucket `name`, or zero if it was never opened.
    pub async fn bucket_len(&self, name: &str) -> usize {
        let buckets = self.buckets.read().await;
        match buckets.get(name) {
            Some(entries) => entries.read().await.len(),
            None => 0,
        }
    }

    /// Drop every entry of bucket `name`.
    pub async fn clear(&self, name: &str) {
        if let Some(entries) = self.buckets.read().await.get(name) {
            entries.write().await.clear();
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryBucket {
    entries: Entries,
}

impl CacheStore for MemoryCache {
    type Bucket = MemoryBucket;

    async fn open(&self, name: &str) -> Result<Self::Bucket, CacheError> {
        let mut buckets = self.buckets.write().await;
        let entries = buckets.entry(name.to_string()).or_default().clone();
        Ok(MemoryBucket { entries })
    }
}

impl CacheBucket for MemoryBucket {
    async fn lookup(&self, key: &str) -> Result<Option<HttpResponse>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, response: HttpResponse) -> Result<(), CacheError> {
        self.entries.write().await.insert(key.to_string(), response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_buckets_are_shared_by_name() {
        let cache = MemoryCache::new();
        let a = cache.open("media").await.unwrap();
        let b = cache.open("media").await.unwrap();
        let other = cache.open("docs").await.unwrap();

        a.put("https://api.x/a.png", HttpResponse::new(200, "OK", "png")).await.unwrap();

        let hit = b.lookup("https://api.x/a.png").await.unwrap().unwrap();
        assert_eq!(hit.body.as_ref(), b"png");
        assert!(other.lookup("https://api.x/a.png").await.unwrap().is_none());
        assert_eq!(cache.bucket_len("media").await, 1);
        assert_eq!(cache.bucket_len("never-opened").await, 0);
    }

    #[tokio::test]
    async fn put_overwrites_existing_entry() {
        let cache = MemoryCache::new();
        let bucket = cache.open("media").await.unwrap();
        bucket.put("k", HttpResponse::new(200, "OK", "v1")).await.unwrap();
        bucket.put("k", HttpResponse::new(200, "OK", "v2")).await.unwrap();
        assert_eq!(bucket.lookup("k").await.unwrap().unwrap().body.as_ref(), b"v2");

        cache.clear("media").await;
        assert_eq!(cache.bucket_len("media").await, 0);
    }

    #[tokio::test]
    async fn no_cache_is_unavailable() {
        let err = NoCache.open("media").await.unwrap_err();
        assert!(matches!(err, CacheError::Unavailable(_)));
    }
}
