use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::ActivityCategory;

/// How a failed activity or embedding fetch affects the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Drop the affected category and keep the rest of the feed.
    #[default]
    DegradeCategory,
    /// Fail the whole request on the first fetch error.
    FailFast,
}

/// Per-category sub-limits for the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryLimits {
    pub viewed: usize,
    pub followed: usize,
    pub liked: usize,
    pub own_reviews: usize,
}

impl CategoryLimits {
    /// Sub-limit for one category.
    pub fn for_category(&self, category: ActivityCategory) -> usize {
        match category {
            ActivityCategory::Viewed => self.viewed,
            ActivityCategory::FollowedAuthorReview => self.followed,
            ActivityCategory::Liked => self.liked,
            ActivityCategory::OwnReview => self.own_reviews,
        }
    }

    /// Sum of all sub-limits.
    pub fn total(&self) -> usize {
        self.viewed + self.followed + self.liked + self.own_reviews
    }
}

impl Default for CategoryLimits {
    fn default() -> Self {
        Self {
            viewed: defaults::DEFAULT_VIEWED_LIMIT,
            followed: defaults::DEFAULT_FOLLOWED_LIMIT,
            liked: defaults::DEFAULT_LIKED_LIMIT,
            own_reviews: defaults::DEFAULT_OWN_REVIEWS_LIMIT,
        }
    }
}

/// Recommendation subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Maximum number of items in a composed feed.
    pub feed_limit: usize,
    /// Exponential recency base for the weighted basis vector.
    pub decay_base: f64,
    /// Per-category sub-limits.
    pub category_limits: CategoryLimits,
    /// Recency window for the randomized fallback feed (days).
    pub fallback_window_days: i64,
    /// Also use the fallback when aggregation produced nothing.
    pub fallback_when_empty: bool,
    /// Exclude every review the user already interacted with from the pool.
    pub exclude_seen: bool,
    /// Exclude the user's own reviews from the pool.
    pub exclude_own_reviews: bool,
    pub failure_policy: FailurePolicy,
    /// Per-call timeout for collaborator fetches. `None` disables it.
    pub fetch_timeout_ms: Option<u64>,
    /// Fixed seed for the fallback shuffle (tests, replays).
    pub rng_seed: Option<u64>,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            feed_limit: defaults::DEFAULT_FEED_LIMIT,
            decay_base: defaults::DEFAULT_DECAY_BASE,
            category_limits: CategoryLimits::default(),
            fallback_window_days: defaults::DEFAULT_FALLBACK_WINDOW_DAYS,
            fallback_when_empty: defaults::DEFAULT_FALLBACK_WHEN_EMPTY,
            exclude_seen: defaults::DEFAULT_EXCLUDE_SEEN,
            exclude_own_reviews: defaults::DEFAULT_EXCLUDE_OWN_REVIEWS,
            failure_policy: FailurePolicy::default(),
            fetch_timeout_ms: Some(defaults::DEFAULT_FETCH_TIMEOUT_MS),
            rng_seed: None,
        }
    }
}
