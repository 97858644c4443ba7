//! AI result cache (`ai_analysis_cache`).

use async_trait::async_trait;
use mongodb::bson::{self, doc, DateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use common::{AppResult, ResultExt};

use crate::documents::{CacheEntry, AI_CACHE_COLLECTION};
use crate::infra::MongoStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// TTL cache for AI results keyed by `cacheKey`.
///
/// An entry is served only while `now < expiresAt`; each served read bumps
/// `hitCount` and `lastUsedAt` in the same round trip.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AiCacheRepository: Send + Sync {
    async fn get_cached(&self, cache_key: &str) -> Option<CacheEntry>;

    /// Insert or overwrite the entry for `cache_key`, resetting its hit count
    async fn put_cached(&self, cache_key: &str, result: Document, ttl_hours: i64) -> AppResult<String>;

    /// Delete every expired entry; returns how many were removed
    async fn purge_expired(&self) -> u64;
}

pub struct AiCacheStore {
    collection: Collection<CacheEntry>,
}

impl AiCacheStore {
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(AI_CACHE_COLLECTION),
        }
    }

    async fn upsert(&self, cache_key: &str, result: Document, ttl_hours: i64) -> AppResult<String> {
        let entry = CacheEntry::new(cache_key, result, ttl_hours)?;
        let set = bson::to_document(&entry)?;

        self.collection
            .update_one(doc! { "cacheKey": cache_key }, doc! { "$set": set })
            .upsert(true)
            .await?;

        Ok(entry.cache_key)
    }
}

#[async_trait]
impl AiCacheRepository for AiCacheStore {
    async fn get_cached(&self, cache_key: &str) -> Option<CacheEntry> {
        let now = DateTime::now();

        self.collection
            .find_one_and_update(
                doc! { "cacheKey": cache_key, "expiresAt": { "$gt": now } },
                doc! { "$inc": { "hitCount": 1 }, "$set": { "lastUsedAt": now } },
            )
            .return_document(ReturnDocument::After)
            .await
            .or_default_logged("get_cached")
    }

    async fn put_cached(&self, cache_key: &str, result: Document, ttl_hours: i64) -> AppResult<String> {
        self.upsert(cache_key, result, ttl_hours)
            .await
            .log_failure("put_cached")
    }

    async fn purge_expired(&self) -> u64 {
        let deleted = self
            .collection
            .delete_many(doc! { "expiresAt": { "$lt": DateTime::now() } })
            .await
            .map(|result| result.deleted_count)
            .or_default_logged("purge_expired");

        tracing::info!(deleted, "Purged expired AI cache entries");
        deleted
    }
}
