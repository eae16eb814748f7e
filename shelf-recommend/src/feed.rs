use serde::{Deserialize, Serialize};

use shelf_core::models::{DegradationEvent, Recommendation};

/// A composed feed and how it was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationFeed {
    pub items: Vec<Recommendation>,
    /// Categories dropped because their fetches failed.
    pub degraded: Vec<DegradationEvent>,
    /// The items came from the recent-reviews fallback.
    pub fallback_used: bool,
}

impl RecommendationFeed {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn review_ids(&self) -> Vec<shelf_core::models::ReviewId> {
        self.items.iter().map(|i| i.review_id).collect()
    }
}
