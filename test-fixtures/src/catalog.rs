use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use shelf_core::errors::{FetchError, ShelfResult};
use shelf_core::models::{ActivityCategory, CandidateQuery, ReviewId, ReviewRecord, UserId};
use shelf_core::traits::{IActivityFeed, IEmbeddingStore};

use crate::scenario::GoldenScenario;

/// In-memory implementation of both collaborator traits.
///
/// Failures and latency can be injected per category, per embedding, or for
/// the candidate pool. Call counters let tests assert how often the engine
/// reached out.
#[derive(Default)]
pub struct InMemoryCatalog {
    reviews: BTreeMap<ReviewId, ReviewRecord>,
    activity: HashMap<(UserId, ActivityCategory), Vec<ReviewId>>,
    failing_categories: HashSet<ActivityCategory>,
    failing_embeddings: HashSet<ReviewId>,
    fail_pool: bool,
    latency: Option<Duration>,
    slow_categories: HashMap<ActivityCategory, Duration>,
    embedding_fetches: AtomicUsize,
    activity_fetches: AtomicUsize,
    pool_fetches: AtomicUsize,
    last_query: Mutex<Option<CandidateQuery>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding a golden scenario's reviews and activity.
    pub fn from_scenario(scenario: &GoldenScenario) -> Self {
        let mut catalog = Self::new().with_reviews(scenario.reviews.iter().cloned());
        for entry in &scenario.activity {
            catalog = catalog.with_activity(entry.user_id, entry.category, entry.review_ids.clone());
        }
        catalog
    }

    pub fn with_review(mut self, review: ReviewRecord) -> Self {
        self.reviews.insert(review.id, review);
        self
    }

    pub fn with_reviews(mut self, reviews: impl IntoIterator<Item = ReviewRecord>) -> Self {
        for review in reviews {
            self.reviews.insert(review.id, review);
        }
        self
    }

    /// Oldest-first activity for one user and category.
    pub fn with_activity(
        mut self,
        user_id: UserId,
        category: ActivityCategory,
        review_ids: Vec<ReviewId>,
    ) -> Self {
        self.activity.insert((user_id, category), review_ids);
        self
    }

    /// Every activity fetch for `category` fails.
    pub fn failing_category(mut self, category: ActivityCategory) -> Self {
        self.failing_categories.insert(category);
        self
    }

    /// Every embedding fetch for `review_id` fails.
    pub fn failing_embedding(mut self, review_id: ReviewId) -> Self {
        self.failing_embeddings.insert(review_id);
        self
    }

    /// Every candidate-pool fetch fails.
    pub fn failing_pool(mut self) -> Self {
        self.fail_pool = true;
        self
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Delay activity fetches for one category.
    pub fn slow_category(mut self, category: ActivityCategory, latency: Duration) -> Self {
        self.slow_categories.insert(category, latency);
        self
    }

    pub fn embedding_fetches(&self) -> usize {
        self.embedding_fetches.load(Ordering::SeqCst)
    }

    pub fn activity_fetches(&self) -> usize {
        self.activity_fetches.load(Ordering::SeqCst)
    }

    pub fn pool_fetches(&self) -> usize {
        self.pool_fetches.load(Ordering::SeqCst)
    }

    /// The most recent candidate-pool query.
    pub fn last_query(&self) -> Option<CandidateQuery> {
        self.last_query.lock().ok().and_then(|q| q.clone())
    }

    async fn delay(&self, extra: Option<Duration>) {
        let total = self.latency.unwrap_or_default() + extra.unwrap_or_default();
        if !total.is_zero() {
            tokio::time::sleep(total).await;
        }
    }
}

fn injected(operation: &str) -> FetchError {
    FetchError::Store {
        operation: operation.to_string(),
        reason: "injected failure".to_string(),
    }
}

impl IEmbeddingStore for InMemoryCatalog {
    async fn fetch_embedding(&self, review_id: ReviewId) -> ShelfResult<Option<Vec<f32>>> {
        self.embedding_fetches.fetch_add(1, Ordering::SeqCst);
        self.delay(None).await;
        if self.failing_embeddings.contains(&review_id) {
            return Err(injected("fetch_embedding").into());
        }
        Ok(self
            .reviews
            .get(&review_id)
            .and_then(|r| r.embedding.clone()))
    }

    async fn fetch_candidate_pool(&self, query: &CandidateQuery) -> ShelfResult<Vec<ReviewRecord>> {
        self.pool_fetches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some(query.clone());
        }
        self.delay(None).await;
        if self.fail_pool {
            return Err(injected("fetch_candidate_pool").into());
        }
        Ok(query.apply(self.reviews.values()))
    }
}

impl IActivityFeed for InMemoryCatalog {
    async fn review_ids(
        &self,
        user_id: UserId,
        category: ActivityCategory,
    ) -> ShelfResult<Vec<ReviewId>> {
        self.activity_fetches.fetch_add(1, Ordering::SeqCst);
        self.delay(self.slow_categories.get(&category).copied()).await;
        if self.failing_categories.contains(&category) {
            return Err(injected("review_ids").into());
        }
        Ok(self
            .activity
            .get(&(user_id, category))
            .cloned()
            .unwrap_or_default())
    }
}
