//! In-memory embedding cache using moka, wrapping any `IEmbeddingStore`.
//!
//! TinyLFU admission, bounded entry count, per-entry TTL. Only positive
//! lookups are cached, so a review that gains an embedding is seen on the
//! next fetch.

use std::time::Duration;

use moka::sync::Cache;

use shelf_core::config::EmbeddingConfig;
use shelf_core::errors::ShelfResult;
use shelf_core::models::{ActivityCategory, CandidateQuery, ReviewId, ReviewRecord, UserId};
use shelf_core::traits::{IActivityFeed, IEmbeddingStore};

/// Caching decorator over an embedding store.
pub struct CachedEmbeddingStore<S> {
    inner: S,
    cache: Cache<ReviewId, Vec<f32>>,
}

impl<S> CachedEmbeddingStore<S> {
    pub fn new(inner: S, config: &EmbeddingConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();
        Self { inner, cache }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop one review's cached embedding, e.g. after it was re-embedded.
    pub fn invalidate(&self, review_id: ReviewId) {
        self.cache.invalidate(&review_id);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Approximate number of cached embeddings.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: IEmbeddingStore> IEmbeddingStore for CachedEmbeddingStore<S> {
    async fn fetch_embedding(&self, review_id: ReviewId) -> ShelfResult<Option<Vec<f32>>> {
        if let Some(hit) = self.cache.get(&review_id) {
            return Ok(Some(hit));
        }
        let fetched = self.inner.fetch_embedding(review_id).await?;
        if let Some(embedding) = &fetched {
            self.cache.insert(review_id, embedding.clone());
        }
        Ok(fetched)
    }

    /// Pass-through. Pool embeddings are not cached: pools are large and
    /// mostly not reused as basis reviews.
    async fn fetch_candidate_pool(&self, query: &CandidateQuery) -> ShelfResult<Vec<ReviewRecord>> {
        self.inner.fetch_candidate_pool(query).await
    }
}

impl<S: IActivityFeed> IActivityFeed for CachedEmbeddingStore<S> {
    async fn review_ids(
        &self,
        user_id: UserId,
        category: ActivityCategory,
    ) -> ShelfResult<Vec<ReviewId>> {
        self.inner.review_ids(user_id, category).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::{make_review, InMemoryCatalog};

    fn config() -> EmbeddingConfig {
        EmbeddingConfig {
            cache_capacity: 100,
            ..EmbeddingConfig::default()
        }
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let catalog = InMemoryCatalog::new().with_review(make_review(1, 1, Some(vec![1.0, 2.0])));
        let store = CachedEmbeddingStore::new(catalog, &config());

        assert_eq!(store.fetch_embedding(1).await.unwrap(), Some(vec![1.0, 2.0]));
        assert_eq!(store.fetch_embedding(1).await.unwrap(), Some(vec![1.0, 2.0]));
        assert_eq!(store.inner().embedding_fetches(), 1);
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let catalog = InMemoryCatalog::new().with_review(make_review(1, 1, None));
        let store = CachedEmbeddingStore::new(catalog, &config());

        assert_eq!(store.fetch_embedding(1).await.unwrap(), None);
        assert_eq!(store.fetch_embedding(1).await.unwrap(), None);
        assert_eq!(store.inner().embedding_fetches(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_a_refetch() {
        let catalog = InMemoryCatalog::new().with_review(make_review(1, 1, Some(vec![1.0])));
        let store = CachedEmbeddingStore::new(catalog, &config());

        store.fetch_embedding(1).await.unwrap();
        store.invalidate(1);
        store.fetch_embedding(1).await.unwrap();
        assert_eq!(store.inner().embedding_fetches(), 2);
    }

    #[tokio::test]
    async fn errors_pass_through_uncached() {
        let catalog = InMemoryCatalog::new().failing_embedding(3);
        let store = CachedEmbeddingStore::new(catalog, &config());
        assert!(store.fetch_embedding(3).await.is_err());
        assert!(store.is_empty());
    }
}
