use serde::{Deserialize, Serialize};

use shelf_core::config::CategoryLimits;
use shelf_core::models::{ActivityCategory, ReviewId, ReviewRecord, UserId};

/// A golden end-to-end scenario: catalog contents, one request, the expected feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenScenario {
    pub description: String,
    pub reviews: Vec<ReviewRecord>,
    #[serde(default)]
    pub activity: Vec<ScenarioActivity>,
    pub request: ScenarioRequest,
    /// Overrides `recommend.decay_base` when set.
    #[serde(default)]
    pub decay_base: Option<f64>,
    /// Overrides `recommend.category_limits` when set.
    #[serde(default)]
    pub category_limits: Option<CategoryLimits>,
    pub expected: ScenarioExpectation,
}

/// Oldest-first activity for one user and category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioActivity {
    pub user_id: UserId,
    pub category: ActivityCategory,
    pub review_ids: Vec<ReviewId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRequest {
    #[serde(default)]
    pub viewer: Option<UserId>,
    /// Basis review for similar-review scenarios.
    #[serde(default)]
    pub review_id: Option<ReviewId>,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioExpectation {
    /// Feed order, exactly.
    pub review_ids: Vec<ReviewId>,
    #[serde(default)]
    pub fallback_used: bool,
}
