//! CategoryAggregator: fetches activity and basis embeddings, then ranks.

use chrono::Utc;
use futures::future::{join_all, try_join_all};
use tracing::{debug, warn};

use shelf_core::config::{FailurePolicy, RecommendConfig};
use shelf_core::errors::{ShelfError, ShelfResult};
use shelf_core::models::{
    ActivityCategory, ActivitySnapshot, CategoryRanking, DegradationEvent, ReviewRecord, UserId,
};
use shelf_core::traits::{IActivityFeed, IEmbeddingStore};
use shelf_ranking::{BasisEntry, SimilarityRanker};

use crate::context::RequestContext;
use crate::exclusion::{aggregate_ranked, CategoryBasis};

/// Activity for one user plus the categories that could not be fetched.
#[derive(Debug, Clone, Default)]
pub struct ActivityFetch {
    pub snapshot: ActivitySnapshot,
    pub degradations: Vec<DegradationEvent>,
}

/// Per-category rankings plus the categories dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub rankings: Vec<CategoryRanking>,
    pub degradations: Vec<DegradationEvent>,
}

/// Produces one ranked list per activity category for one user.
pub struct CategoryAggregator<'a, E, A> {
    store: &'a E,
    feed: &'a A,
    ranker: SimilarityRanker,
    config: RecommendConfig,
}

impl<'a, E, A> CategoryAggregator<'a, E, A>
where
    E: IEmbeddingStore,
    A: IActivityFeed,
{
    pub fn new(store: &'a E, feed: &'a A, config: RecommendConfig) -> Self {
        Self {
            store,
            feed,
            ranker: SimilarityRanker::new(),
            config,
        }
    }

    pub fn with_ranker(mut self, ranker: SimilarityRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Fetch every category's activity for `user_id` concurrently.
    pub async fn fetch_activity(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> ShelfResult<ActivityFetch> {
        let fetches = ActivityCategory::PRIORITY.iter().map(|&category| async move {
            ctx.guard("review_ids", self.feed.review_ids(user_id, category))
                .await
        });
        let results = join_all(fetches).await;

        let mut out = ActivityFetch::default();
        for (category, result) in ActivityCategory::PRIORITY.into_iter().zip(results) {
            match result {
                Ok(ids) => out.snapshot.insert(category, ids),
                Err(e) => out.degradations.push(self.degrade(category, e)?),
            }
        }

        debug!(
            user_id,
            activity = out.snapshot.all_review_ids().len(),
            degraded = out.degradations.len(),
            "activity fetched"
        );
        Ok(out)
    }

    /// Fetch basis embeddings for `snapshot` and rank `pool` per category.
    pub async fn aggregate(
        &self,
        ctx: &RequestContext,
        snapshot: &ActivitySnapshot,
        pool: &[ReviewRecord],
    ) -> ShelfResult<Aggregation> {
        let fetches = ActivityCategory::PRIORITY.iter().map(|&category| async move {
            let ids = snapshot.review_ids(category);
            try_join_all(ids.iter().map(|&id| async move {
                let embedding = ctx
                    .guard("fetch_embedding", self.store.fetch_embedding(id))
                    .await?;
                Ok::<_, ShelfError>(BasisEntry::new(id, embedding))
            }))
            .await
        });
        let results = join_all(fetches).await;

        let mut bases = Vec::with_capacity(results.len());
        let mut degradations = Vec::new();
        for (category, result) in ActivityCategory::PRIORITY.into_iter().zip(results) {
            match result {
                Ok(entries) => bases.push(CategoryBasis::new(category, entries)),
                Err(e) => degradations.push(self.degrade(category, e)?),
            }
        }

        ctx.check_cancelled("aggregate")?;
        let rankings = aggregate_ranked(
            &self.ranker,
            pool,
            &bases,
            &self.config.category_limits,
            self.config.decay_base,
        )?;

        Ok(Aggregation {
            rankings,
            degradations,
        })
    }

    /// Fetch activity, then aggregate. Convenience for callers that already hold a pool.
    pub async fn aggregate_for_user(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        pool: &[ReviewRecord],
    ) -> ShelfResult<Aggregation> {
        let activity = self.fetch_activity(ctx, user_id).await?;
        let mut aggregation = self.aggregate(ctx, &activity.snapshot, pool).await?;
        let mut degradations = activity.degradations;
        degradations.append(&mut aggregation.degradations);
        aggregation.degradations = degradations;
        Ok(aggregation)
    }

    /// Apply the failure policy to a failed category fetch.
    ///
    /// Returns the degradation event when the category may be dropped, or the
    /// error itself when it must propagate.
    fn degrade(
        &self,
        category: ActivityCategory,
        error: ShelfError,
    ) -> ShelfResult<DegradationEvent> {
        if error.is_cancelled() || !error.is_fetch_failure() {
            return Err(error);
        }
        match self.config.failure_policy {
            FailurePolicy::FailFast => Err(error),
            FailurePolicy::DegradeCategory => {
                warn!(%category, error = %error, "category fetch failed, dropping category");
                Ok(DegradationEvent {
                    component: format!("aggregation.{category}"),
                    failure: error.to_string(),
                    fallback_used: "category dropped".to_string(),
                    timestamp: Utc::now(),
                })
            }
        }
    }
}
