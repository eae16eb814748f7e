use std::collections::HashSet;

use proptest::prelude::*;
use shelf_aggregation::{aggregate_ranked, CategoryBasis};
use shelf_core::config::CategoryLimits;
use shelf_core::models::{ActivityCategory, ReviewId, ReviewRecord};
use shelf_ranking::{BasisEntry, SimilarityRanker};
use test_fixtures::make_review;

const DIMS: usize = 3;

fn arb_vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0f32..1.0, DIMS)
}

fn arb_pool() -> impl Strategy<Value = Vec<ReviewRecord>> {
    prop::collection::vec(prop::option::weighted(0.9, arb_vector()), 0..60).prop_map(|vs| {
        vs.into_iter()
            .enumerate()
            .map(|(i, v)| make_review(i as ReviewId + 1, i as i64, v))
            .collect()
    })
}

fn arb_bases() -> impl Strategy<Value = Vec<CategoryBasis>> {
    prop::collection::vec(prop::collection::vec(arb_vector(), 0..4), 4).prop_map(|per_category| {
        ActivityCategory::PRIORITY
            .into_iter()
            .zip(per_category)
            .enumerate()
            .map(|(c, (category, vectors))| {
                let entries = vectors
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| BasisEntry::new(10_000 + (c * 10 + i) as ReviewId, Some(v)))
                    .collect();
                CategoryBasis::new(category, entries)
            })
            .collect()
    })
}

fn arb_limits() -> impl Strategy<Value = CategoryLimits> {
    (0usize..20, 0usize..20, 0usize..20, 0usize..20).prop_map(|(v, f, l, o)| CategoryLimits {
        viewed: v,
        followed: f,
        liked: l,
        own_reviews: o,
    })
}

proptest! {
    #[test]
    fn no_review_in_two_categories(
        pool in arb_pool(),
        bases in arb_bases(),
        limits in arb_limits(),
    ) {
        let rankings = aggregate_ranked(&SimilarityRanker::new(), &pool, &bases, &limits, 2.0).unwrap();
        let mut seen = HashSet::new();
        for ranking in &rankings {
            prop_assert!(ranking.ranked.len() <= limits.for_category(ranking.category));
            for r in &ranking.ranked {
                prop_assert!(seen.insert(r.review_id));
            }
        }
    }

    #[test]
    fn first_category_is_unaffected_by_later_ones(
        pool in arb_pool(),
        bases in arb_bases(),
        limits in arb_limits(),
    ) {
        let all = aggregate_ranked(&SimilarityRanker::new(), &pool, &bases, &limits, 2.0).unwrap();
        let alone = aggregate_ranked(&SimilarityRanker::new(), &pool, &bases[..1], &limits, 2.0).unwrap();
        prop_assert_eq!(&all[0], &alone[0]);
    }

    #[test]
    fn total_output_bounded_by_pool(
        pool in arb_pool(),
        bases in arb_bases(),
        limits in arb_limits(),
    ) {
        let rankings = aggregate_ranked(&SimilarityRanker::new(), &pool, &bases, &limits, 2.0).unwrap();
        let total: usize = rankings.iter().map(|r| r.ranked.len()).sum();
        let with_embeddings = pool.iter().filter(|r| r.embedding.is_some()).count();
        prop_assert!(total <= with_embeddings);
        prop_assert!(total <= limits.total());
    }
}
