//! Sequential-exclusion ranking across categories.

use std::collections::HashSet;

use tracing::debug;

use shelf_core::config::CategoryLimits;
use shelf_core::errors::ShelfResult;
use shelf_core::models::{ActivityCategory, CategoryRanking, ReviewId, ReviewRecord};
use shelf_ranking::{build_basis_vector, BasisEntry, SimilarityRanker};

/// Oldest-first basis reviews of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBasis {
    pub category: ActivityCategory,
    pub entries: Vec<BasisEntry>,
}

impl CategoryBasis {
    pub fn new(category: ActivityCategory, entries: Vec<BasisEntry>) -> Self {
        Self { category, entries }
    }
}

/// Rank `pool` once per category, in `ActivityCategory::PRIORITY` order.
///
/// A review returned for one category is removed from the pool before the
/// next category is ranked, so no review appears in two rankings. Each
/// category also excludes its own basis reviews. Categories missing from
/// `bases`, or whose basis has no embeddings, get an empty ranking.
///
/// Always returns one `CategoryRanking` per category, in priority order.
pub fn aggregate_ranked(
    ranker: &SimilarityRanker,
    pool: &[ReviewRecord],
    bases: &[CategoryBasis],
    limits: &CategoryLimits,
    decay_base: f64,
) -> ShelfResult<Vec<CategoryRanking>> {
    let mut claimed: HashSet<ReviewId> = HashSet::new();
    let mut rankings = Vec::with_capacity(ActivityCategory::PRIORITY.len());

    for category in ActivityCategory::PRIORITY {
        let entries = bases
            .iter()
            .find(|b| b.category == category)
            .map(|b| b.entries.as_slice())
            .unwrap_or(&[]);

        let ranked = match build_basis_vector(entries, decay_base)? {
            Some(vector) => {
                let mut exclude = claimed.clone();
                exclude.extend(entries.iter().map(|e| e.review_id));
                ranker.rank_against(pool, &vector, &exclude, limits.for_category(category))?
            }
            None => Vec::new(),
        };

        claimed.extend(ranked.iter().map(|r| r.review_id));
        debug!(
            %category,
            basis = entries.len(),
            ranked = ranked.len(),
            claimed = claimed.len(),
            "category ranked"
        );
        rankings.push(CategoryRanking { category, ranked });
    }

    Ok(rankings)
}
