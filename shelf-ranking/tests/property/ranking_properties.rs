use std::collections::HashSet;

use proptest::prelude::*;
use shelf_core::models::{ReviewId, ReviewRecord};
use shelf_ranking::{BasisEntry, SimilarityRanker};
use test_fixtures::make_review;

const DIMS: usize = 4;

fn arb_embedding() -> impl Strategy<Value = Option<Vec<f32>>> {
    prop_oneof![
        4 => prop::collection::vec(-1.0f32..1.0, DIMS).prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_pool() -> impl Strategy<Value = Vec<ReviewRecord>> {
    prop::collection::vec(arb_embedding(), 0..40).prop_map(|embeddings| {
        embeddings
            .into_iter()
            .enumerate()
            .map(|(i, e)| make_review(i as ReviewId + 1, 1000 + i as i64, e))
            .collect()
    })
}

// ── rank_by_basis_review ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn basis_review_never_in_output(pool in arb_pool(), pick in 0usize..40, limit in 0usize..50) {
        let basis_id = (pick % pool.len().max(1)) as ReviewId + 1;
        let ranked = SimilarityRanker::new().rank_by_basis_review(&pool, basis_id, limit).unwrap();
        prop_assert!(ranked.iter().all(|r| r.review_id != basis_id));
        prop_assert!(ranked.len() <= limit);
    }
}

// ── rank_by_basis_set ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn basis_set_output_len_is_min_of_limit_and_eligible(
        pool in arb_pool(),
        basis_embeddings in prop::collection::vec(prop::collection::vec(-1.0f32..1.0, DIMS), 1..5),
        limit in 0usize..50,
    ) {
        // Basis IDs live outside the pool's ID range.
        let basis: Vec<BasisEntry> = basis_embeddings
            .into_iter()
            .enumerate()
            .map(|(i, e)| BasisEntry::new(10_000 + i as ReviewId, Some(e)))
            .collect();
        let ranked = SimilarityRanker::new().rank_by_basis_set(&pool, &basis, limit, 2.0).unwrap();
        let with_embeddings = pool.iter().filter(|r| r.embedding.is_some()).count();
        prop_assert_eq!(ranked.len(), limit.min(with_embeddings));
    }

    #[test]
    fn basis_set_excludes_basis_ids_and_is_sorted(
        pool in arb_pool(),
        basis_picks in prop::collection::vec(0usize..40, 1..6),
        limit in 1usize..50,
    ) {
        let basis: Vec<BasisEntry> = basis_picks
            .iter()
            .filter_map(|p| pool.get(p % pool.len().max(1)))
            .map(|r| BasisEntry::new(r.id, r.embedding.clone()))
            .collect();
        let basis_ids: HashSet<ReviewId> = basis.iter().map(|b| b.review_id).collect();

        let ranked = SimilarityRanker::new().rank_by_basis_set(&pool, &basis, limit, 2.0).unwrap();
        prop_assert!(ranked.len() <= limit);
        prop_assert!(ranked.iter().all(|r| !basis_ids.contains(&r.review_id)));
        prop_assert!(ranked.windows(2).all(|w| w[0].similarity >= w[1].similarity));

        let without_embedding: HashSet<ReviewId> = pool
            .iter()
            .filter(|r| r.embedding.is_none())
            .map(|r| r.id)
            .collect();
        prop_assert!(ranked.iter().all(|r| !without_embedding.contains(&r.review_id)));
    }

    #[test]
    fn parallel_and_sequential_scoring_agree(pool in arb_pool(), limit in 1usize..50) {
        let basis = [0.5f32, -0.25, 1.0, 0.0];
        let exclude = HashSet::new();
        let sequential = SimilarityRanker::with_parallel_threshold(usize::MAX)
            .rank_against(&pool, &basis, &exclude, limit)
            .unwrap();
        let parallel = SimilarityRanker::with_parallel_threshold(1)
            .rank_against(&pool, &basis, &exclude, limit)
            .unwrap();
        prop_assert_eq!(sequential, parallel);
    }
}
