use serde::{Deserialize, Serialize};

use super::activity::ActivityCategory;
use super::review::{ReviewId, UserId};

/// A candidate scored against a basis vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReview {
    pub review_id: ReviewId,
    pub author_id: UserId,
    /// Cosine similarity in [-1.0, 1.0].
    pub similarity: f64,
}

/// Ranked output of one activity category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRanking {
    pub category: ActivityCategory,
    pub ranked: Vec<RankedReview>,
}

/// Where a feed item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "category")]
pub enum RecommendationSource {
    Category(ActivityCategory),
    /// Randomized recent-items fallback.
    Recent,
}

/// One item of a composed feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub review_id: ReviewId,
    pub author_id: UserId,
    /// Similarity to the category basis; `None` for fallback items.
    pub similarity: Option<f64>,
    pub source: RecommendationSource,
}
