use proptest::prelude::*;
use shelf_vector::{cosine_similarity, weighted_average, WeightedEntry};

fn arb_nonzero_vector(dims: usize) -> impl Strategy<Value = Vec<f32>> {
    (prop::collection::vec(-100.0f32..100.0, dims), -30i32..=2)
        .prop_map(|(v, exp)| {
            let scale = 10f32.powi(exp);
            v.into_iter().map(|x| x * scale).collect::<Vec<f32>>()
        })
        .prop_filter("non-zero norm", |v| v.iter().any(|x| *x != 0.0))
}

fn arb_pair() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (1usize..32).prop_flat_map(|d| (arb_nonzero_vector(d), arb_nonzero_vector(d)))
}

// ── Cosine similarity ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn self_similarity_is_one(v in (1usize..32).prop_flat_map(arb_nonzero_vector)) {
        let sim = cosine_similarity(&v, &v).unwrap();
        prop_assert!((sim - 1.0).abs() < 1e-6, "self similarity was {}", sim);
    }

    #[test]
    fn negated_similarity_is_minus_one(v in (1usize..32).prop_flat_map(arb_nonzero_vector)) {
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        let sim = cosine_similarity(&v, &neg).unwrap();
        prop_assert!((sim + 1.0).abs() < 1e-6, "negated similarity was {}", sim);
    }

    #[test]
    fn similarity_is_symmetric((a, b) in arb_pair()) {
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        prop_assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn similarity_is_bounded((a, b) in arb_pair()) {
        let sim = cosine_similarity(&a, &b).unwrap();
        prop_assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn mismatched_lengths_always_fail(
        a in prop::collection::vec(-1.0f32..1.0, 1..16),
        extra in 1usize..4,
    ) {
        let b = vec![0.5f32; a.len() + extra];
        prop_assert!(cosine_similarity(&a, &b).is_err());
    }
}

// ── Weighted average ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn single_vector_is_identity(
        v in prop::collection::vec(-100.0f32..100.0, 1..32),
        position in 0usize..10_000,
        base in 0.1f64..8.0,
    ) {
        let avg = weighted_average(&[WeightedEntry::new(&v, position)], base).unwrap();
        prop_assert_eq!(avg, v);
    }

    #[test]
    fn base_one_matches_arithmetic_mean(
        vectors in (1usize..8).prop_flat_map(|d| {
            prop::collection::vec(prop::collection::vec(-50.0f32..50.0, d), 1..12)
        }),
    ) {
        let entries: Vec<WeightedEntry<'_>> = vectors
            .iter()
            .enumerate()
            .map(|(i, v)| WeightedEntry::new(v, i))
            .collect();
        let avg = weighted_average(&entries, 1.0).unwrap();
        let n = vectors.len() as f64;
        for (d, value) in avg.iter().enumerate() {
            let mean: f64 = vectors.iter().map(|v| v[d] as f64).sum::<f64>() / n;
            prop_assert!((*value as f64 - mean).abs() < 1e-3, "dim {}: {} vs {}", d, value, mean);
        }
    }

    #[test]
    fn average_stays_within_componentwise_bounds(
        vectors in (1usize..8).prop_flat_map(|d| {
            prop::collection::vec(prop::collection::vec(-50.0f32..50.0, d), 1..12)
        }),
        base in 0.1f64..8.0,
    ) {
        let entries: Vec<WeightedEntry<'_>> = vectors
            .iter()
            .enumerate()
            .map(|(i, v)| WeightedEntry::new(v, i))
            .collect();
        let avg = weighted_average(&entries, base).unwrap();
        for (d, value) in avg.iter().enumerate() {
            let lo = vectors.iter().map(|v| v[d]).fold(f32::INFINITY, f32::min);
            let hi = vectors.iter().map(|v| v[d]).fold(f32::NEG_INFINITY, f32::max);
            prop_assert!(*value >= lo - 1e-3 && *value <= hi + 1e-3);
        }
    }
}
