//! SimilarityRanker: top-N candidates by descending cosine similarity.
//!
//! Ties keep the candidates' input order, so equal scores rank
//! deterministically.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use shelf_core::errors::ShelfResult;
use shelf_core::models::{RankedReview, ReviewId, ReviewRecord};
use shelf_vector::cosine_similarity;

use crate::basis::{build_basis_vector, BasisEntry};

/// Pools at least this large are scored on the rayon pool.
const DEFAULT_PARALLEL_THRESHOLD: usize = 512;

/// Ranks candidate reviews against a basis vector.
#[derive(Debug, Clone)]
pub struct SimilarityRanker {
    parallel_threshold: usize,
}

impl SimilarityRanker {
    pub fn new() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Override the pool size at which scoring switches to rayon.
    pub fn with_parallel_threshold(threshold: usize) -> Self {
        Self {
            parallel_threshold: threshold.max(1),
        }
    }

    /// Rank against the embedding of `basis_review_id`, looked up in `candidates`.
    ///
    /// Returns an empty list when the basis is not in the pool or has no embedding.
    pub fn rank_by_basis_review(
        &self,
        candidates: &[ReviewRecord],
        basis_review_id: ReviewId,
        limit: usize,
    ) -> ShelfResult<Vec<RankedReview>> {
        let basis_embedding = candidates
            .iter()
            .find(|r| r.id == basis_review_id)
            .and_then(|r| r.embedding());
        self.rank_by_basis_embedding(candidates, basis_review_id, basis_embedding, limit)
    }

    /// Rank against a basis embedding the caller fetched separately.
    ///
    /// The basis review is excluded from the output even if it is in the pool.
    pub fn rank_by_basis_embedding(
        &self,
        candidates: &[ReviewRecord],
        basis_review_id: ReviewId,
        basis_embedding: Option<&[f32]>,
        limit: usize,
    ) -> ShelfResult<Vec<RankedReview>> {
        let Some(basis) = basis_embedding else {
            debug!(basis_review_id, "basis review has no embedding");
            return Ok(Vec::new());
        };
        let exclude = HashSet::from([basis_review_id]);
        self.rank_against(candidates, basis, &exclude, limit)
    }

    /// Rank against the recency-weighted average of `basis` (oldest first).
    ///
    /// Basis entries without embeddings are skipped. Every basis ID is
    /// excluded from the output. Returns an empty list when no basis entry
    /// has an embedding.
    pub fn rank_by_basis_set(
        &self,
        candidates: &[ReviewRecord],
        basis: &[BasisEntry],
        limit: usize,
        decay_base: f64,
    ) -> ShelfResult<Vec<RankedReview>> {
        let Some(vector) = build_basis_vector(basis, decay_base)? else {
            debug!(basis = basis.len(), "no basis entry has an embedding");
            return Ok(Vec::new());
        };
        let exclude: HashSet<ReviewId> = basis.iter().map(|b| b.review_id).collect();
        self.rank_against(candidates, &vector, &exclude, limit)
    }

    /// Score every eligible candidate against `basis` and keep the top `limit`.
    ///
    /// Eligible: has an embedding, not in `exclude`, first occurrence of its ID.
    ///
    /// # Errors
    /// `DimensionMismatch` if any eligible candidate's embedding differs in
    /// length from `basis`.
    pub fn rank_against(
        &self,
        candidates: &[ReviewRecord],
        basis: &[f32],
        exclude: &HashSet<ReviewId>,
        limit: usize,
    ) -> ShelfResult<Vec<RankedReview>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut seen: HashSet<ReviewId> = HashSet::with_capacity(candidates.len());
        let eligible: Vec<(&ReviewRecord, &[f32])> = candidates
            .iter()
            .filter(|r| !exclude.contains(&r.id))
            .filter_map(|r| r.embedding().map(|e| (r, e)))
            .filter(|(r, _)| seen.insert(r.id))
            .collect();

        let score = |(review, embedding): &(&ReviewRecord, &[f32])| -> ShelfResult<RankedReview> {
            Ok(RankedReview {
                review_id: review.id,
                author_id: review.author_id,
                similarity: cosine_similarity(basis, embedding)?,
            })
        };

        // Indexed collect keeps input order, which the stable sort relies on.
        let mut scored: Vec<RankedReview> = if eligible.len() >= self.parallel_threshold {
            eligible.par_iter().map(score).collect::<ShelfResult<_>>()?
        } else {
            eligible.iter().map(score).collect::<ShelfResult<_>>()?
        };

        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(limit);

        debug!(
            eligible = eligible.len(),
            returned = scored.len(),
            limit,
            "ranked candidates"
        );
        Ok(scored)
    }
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shelf_core::errors::VectorError;
    use shelf_core::models::ReviewVisibility;
    use shelf_core::ShelfError;

    fn review(id: ReviewId, embedding: Option<Vec<f32>>) -> ReviewRecord {
        ReviewRecord {
            id,
            author_id: id * 10,
            isbn: String::new(),
            title: String::new(),
            body: String::new(),
            published_at: Utc::now(),
            embedding,
            visibility: ReviewVisibility::default(),
        }
    }

    fn ids(ranked: &[RankedReview]) -> Vec<ReviewId> {
        ranked.iter().map(|r| r.review_id).collect()
    }

    #[test]
    fn ranks_by_descending_similarity() {
        let pool = vec![
            review(1, Some(vec![0.0, 1.0])),
            review(2, Some(vec![1.0, 0.1])),
            review(3, Some(vec![1.0, 1.0])),
        ];
        let ranked = SimilarityRanker::new()
            .rank_against(&pool, &[1.0, 0.0], &HashSet::new(), 10)
            .unwrap();
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
        assert_eq!(ranked[0].author_id, 20);
    }

    #[test]
    fn ties_keep_input_order() {
        let pool = vec![
            review(7, Some(vec![1.0, 0.0])),
            review(3, Some(vec![2.0, 0.0])),
            review(5, Some(vec![0.5, 0.0])),
        ];
        let ranked = SimilarityRanker::new()
            .rank_against(&pool, &[1.0, 0.0], &HashSet::new(), 10)
            .unwrap();
        assert_eq!(ids(&ranked), vec![7, 3, 5]);
    }

    #[test]
    fn ties_keep_input_order_when_parallel() {
        let pool: Vec<ReviewRecord> = (0..64).map(|i| review(i, Some(vec![1.0, 0.0]))).collect();
        let ranked = SimilarityRanker::with_parallel_threshold(1)
            .rank_against(&pool, &[1.0, 0.0], &HashSet::new(), 64)
            .unwrap();
        assert_eq!(ids(&ranked), (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn candidates_without_embeddings_are_skipped() {
        let pool = vec![review(1, None), review(2, Some(vec![1.0]))];
        let ranked = SimilarityRanker::new()
            .rank_against(&pool, &[1.0], &HashSet::new(), 10)
            .unwrap();
        assert_eq!(ids(&ranked), vec![2]);
    }

    #[test]
    fn duplicate_candidates_are_ranked_once() {
        let pool = vec![review(1, Some(vec![1.0])), review(1, Some(vec![1.0]))];
        let ranked = SimilarityRanker::new()
            .rank_against(&pool, &[1.0], &HashSet::new(), 10)
            .unwrap();
        assert_eq!(ids(&ranked), vec![1]);
    }

    #[test]
    fn zero_limit_returns_nothing() {
        let pool = vec![review(1, Some(vec![1.0]))];
        let ranked = SimilarityRanker::new()
            .rank_against(&pool, &[1.0], &HashSet::new(), 0)
            .unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn basis_review_is_excluded() {
        let pool = vec![
            review(1, Some(vec![1.0, 0.0])),
            review(2, Some(vec![0.9, 0.1])),
            review(3, Some(vec![0.0, 1.0])),
        ];
        let ranked = SimilarityRanker::new()
            .rank_by_basis_review(&pool, 1, 10)
            .unwrap();
        assert_eq!(ids(&ranked), vec![2, 3]);
    }

    #[test]
    fn basis_review_without_embedding_yields_empty() {
        let pool = vec![review(1, None), review(2, Some(vec![1.0]))];
        let ranked = SimilarityRanker::new()
            .rank_by_basis_review(&pool, 1, 10)
            .unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn basis_review_missing_from_pool_yields_empty() {
        let pool = vec![review(2, Some(vec![1.0]))];
        let ranked = SimilarityRanker::new()
            .rank_by_basis_review(&pool, 99, 10)
            .unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn basis_set_excludes_every_basis_id() {
        let pool = vec![
            review(101, Some(vec![1.0, 0.0])),
            review(102, Some(vec![0.0, 1.0])),
            review(201, Some(vec![0.0, 1.0])),
        ];
        let basis = vec![
            BasisEntry::new(101, Some(vec![1.0, 0.0])),
            BasisEntry::new(102, Some(vec![0.0, 1.0])),
        ];
        let ranked = SimilarityRanker::new()
            .rank_by_basis_set(&pool, &basis, 10, 2.0)
            .unwrap();
        assert_eq!(ids(&ranked), vec![201]);
    }

    #[test]
    fn basis_set_without_embeddings_yields_empty() {
        let pool = vec![review(1, Some(vec![1.0]))];
        let basis = vec![BasisEntry::new(5, None)];
        let ranked = SimilarityRanker::new()
            .rank_by_basis_set(&pool, &basis, 10, 2.0)
            .unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn dimension_mismatch_is_surfaced() {
        let pool = vec![review(1, Some(vec![1.0, 0.0, 0.0]))];
        let err = SimilarityRanker::new()
            .rank_against(&pool, &[1.0, 0.0], &HashSet::new(), 10)
            .unwrap_err();
        assert!(matches!(
            err,
            ShelfError::VectorError(VectorError::DimensionMismatch { .. })
        ));
    }
}
