//! RecommendationEngine: orchestrates one feed or similar-reviews request.
//!
//! Feed pipeline:
//! activity → (empty ⇒ fallback) → candidate pool → per-category ranking →
//! round-robin → (empty ⇒ fallback when enabled).

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, info_span, Instrument};

use shelf_aggregation::{ActivityFetch, CategoryAggregator, RequestContext};
use shelf_core::config::RecommendConfig;
use shelf_core::constants::MAX_FEED_LIMIT;
use shelf_core::errors::{ShelfError, ShelfResult};
use shelf_core::models::{
    ActivitySnapshot, CandidateQuery, DegradationEvent, RankedReview, Recommendation,
    RecommendationSource, ReviewId, UserId,
};
use shelf_core::traits::{IActivityFeed, IEmbeddingStore};
use shelf_ranking::SimilarityRanker;

use crate::composer::{compose, recent_shuffled};
use crate::feed::RecommendationFeed;

/// The recommendation engine. Holds borrowed collaborators and its own config.
pub struct RecommendationEngine<'a, E, A> {
    store: &'a E,
    aggregator: CategoryAggregator<'a, E, A>,
    ranker: SimilarityRanker,
    config: RecommendConfig,
    /// Pinned clock for the fallback window. `None` reads the system clock.
    now: Option<DateTime<Utc>>,
}

impl<'a, E, A> RecommendationEngine<'a, E, A>
where
    E: IEmbeddingStore,
    A: IActivityFeed,
{
    pub fn new(store: &'a E, feed: &'a A, config: RecommendConfig) -> Self {
        Self {
            store,
            aggregator: CategoryAggregator::new(store, feed, config.clone()),
            ranker: SimilarityRanker::new(),
            config,
            now: None,
        }
    }

    /// Pin the clock used for the fallback recency window.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn with_ranker(mut self, ranker: SimilarityRanker) -> Self {
        self.aggregator = self.aggregator.with_ranker(ranker.clone());
        self.ranker = ranker;
        self
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Build the feed for `viewer` (`None` for anonymous), at most `limit` items.
    pub async fn recommend(
        &self,
        ctx: &RequestContext,
        viewer: Option<UserId>,
        limit: usize,
    ) -> ShelfResult<RecommendationFeed> {
        validate_limit(limit)?;
        let span = info_span!(
            "recommend",
            request_id = %ctx.request_id(),
            viewer = ?viewer,
            limit
        );
        self.recommend_inner(ctx, viewer, limit).instrument(span).await
    }

    async fn recommend_inner(
        &self,
        ctx: &RequestContext,
        viewer: Option<UserId>,
        limit: usize,
    ) -> ShelfResult<RecommendationFeed> {
        // Step 1: Activity. Anonymous viewers have none.
        let activity = match viewer {
            Some(user_id) => self.aggregator.fetch_activity(ctx, user_id).await?,
            None => ActivityFetch::default(),
        };
        let ActivityFetch {
            snapshot,
            mut degradations,
        } = activity;

        // Step 2: No activity at all ⇒ recent-reviews fallback.
        if snapshot.is_empty() {
            debug!("no activity, using recent-reviews fallback");
            return self
                .fallback_feed(ctx, viewer, &snapshot, limit, degradations)
                .await;
        }

        // Step 3: One shared candidate pool.
        let query = self.pool_query(CandidateQuery::similarity_pool(viewer), viewer, &snapshot);
        let pool = ctx
            .guard("fetch_candidate_pool", self.store.fetch_candidate_pool(&query))
            .await?;
        debug!(pool = pool.len(), "candidate pool fetched");

        // Step 4: Rank per category and interleave.
        let mut aggregation = self.aggregator.aggregate(ctx, &snapshot, &pool).await?;
        degradations.append(&mut aggregation.degradations);
        let items = compose(&aggregation.rankings, limit);

        if items.is_empty() && self.config.fallback_when_empty {
            debug!("aggregation produced nothing, using recent-reviews fallback");
            return self
                .fallback_feed(ctx, viewer, &snapshot, limit, degradations)
                .await;
        }

        info!(
            items = items.len(),
            degraded = degradations.len(),
            fallback_used = false,
            "recommendation complete"
        );
        Ok(RecommendationFeed {
            items,
            degraded: degradations,
            fallback_used: false,
        })
    }

    /// Reviews similar to `review_id`, for `viewer`'s visibility rules.
    ///
    /// Empty when the basis review has no embedding or does not exist.
    pub async fn similar_reviews(
        &self,
        ctx: &RequestContext,
        review_id: ReviewId,
        viewer: Option<UserId>,
        limit: usize,
    ) -> ShelfResult<Vec<RankedReview>> {
        validate_limit(limit)?;
        let span = info_span!(
            "similar_reviews",
            request_id = %ctx.request_id(),
            review_id,
            viewer = ?viewer,
            limit
        );
        self.similar_inner(ctx, review_id, viewer, limit)
            .instrument(span)
            .await
    }

    async fn similar_inner(
        &self,
        ctx: &RequestContext,
        review_id: ReviewId,
        viewer: Option<UserId>,
        limit: usize,
    ) -> ShelfResult<Vec<RankedReview>> {
        let Some(basis) = ctx
            .guard("fetch_embedding", self.store.fetch_embedding(review_id))
            .await?
        else {
            debug!("basis review has no embedding");
            return Ok(Vec::new());
        };

        let query = CandidateQuery::similarity_pool(viewer).excluding([review_id]);
        let pool = ctx
            .guard("fetch_candidate_pool", self.store.fetch_candidate_pool(&query))
            .await?;

        let ranked = self
            .ranker
            .rank_by_basis_embedding(&pool, review_id, Some(&basis), limit)?;
        info!(pool = pool.len(), items = ranked.len(), "similar reviews ranked");
        Ok(ranked)
    }

    /// Apply the seen/own exclusions to a pool query.
    fn pool_query(
        &self,
        query: CandidateQuery,
        viewer: Option<UserId>,
        snapshot: &ActivitySnapshot,
    ) -> CandidateQuery {
        let query = if self.config.exclude_seen {
            query.excluding(snapshot.all_review_ids())
        } else {
            query
        };
        if self.config.exclude_own_reviews {
            query.excluding_author(viewer)
        } else {
            query
        }
    }

    async fn fallback_feed(
        &self,
        ctx: &RequestContext,
        viewer: Option<UserId>,
        snapshot: &ActivitySnapshot,
        limit: usize,
        degradations: Vec<DegradationEvent>,
    ) -> ShelfResult<RecommendationFeed> {
        let now = self.now.unwrap_or_else(Utc::now);
        let window = Duration::days(self.config.fallback_window_days);
        let query = self.pool_query(CandidateQuery::recent_pool(viewer, now - window), viewer, snapshot);
        let candidates = ctx
            .guard("fetch_candidate_pool", self.store.fetch_candidate_pool(&query))
            .await?;
        let pool_size = candidates.len();

        let mut rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let items: Vec<Recommendation> = recent_shuffled(candidates, now, window, limit, &mut rng)
            .into_iter()
            .map(|r| Recommendation {
                review_id: r.id,
                author_id: r.author_id,
                similarity: None,
                source: RecommendationSource::Recent,
            })
            .collect();

        info!(
            items = items.len(),
            pool = pool_size,
            degraded = degradations.len(),
            fallback_used = true,
            "recommendation complete"
        );
        Ok(RecommendationFeed {
            items,
            degraded: degradations,
            fallback_used: true,
        })
    }
}

fn validate_limit(limit: usize) -> ShelfResult<()> {
    if limit == 0 || limit > MAX_FEED_LIMIT {
        return Err(ShelfError::InvalidLimit {
            requested: limit,
            max: MAX_FEED_LIMIT,
        });
    }
    Ok(())
}
