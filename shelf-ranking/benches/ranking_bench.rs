use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shelf_core::models::ReviewRecord;
use shelf_ranking::{BasisEntry, SimilarityRanker};
use test_fixtures::make_review;

const DIMS: usize = 384;

fn pseudo_embedding(seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..DIMS)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as f32 / u32::MAX as f32) - 0.5
        })
        .collect()
}

fn pool(n: usize) -> Vec<ReviewRecord> {
    (0..n)
        .map(|i| make_review(i as i64 + 1, i as i64, Some(pseudo_embedding(i as u64))))
        .collect()
}

fn bench_rank_against(c: &mut Criterion) {
    let ranker = SimilarityRanker::new();
    let basis = pseudo_embedding(u64::MAX);
    let exclude = HashSet::new();
    for n in [1_000, 10_000] {
        let candidates = pool(n);
        c.bench_function(&format!("rank_against_{n}"), |b| {
            b.iter(|| {
                ranker
                    .rank_against(black_box(&candidates), black_box(&basis), &exclude, 20)
                    .unwrap()
            })
        });
    }
}

fn bench_rank_by_basis_set(c: &mut Criterion) {
    let ranker = SimilarityRanker::new();
    let candidates = pool(5_000);
    let basis: Vec<BasisEntry> = (0..50)
        .map(|i| BasisEntry::new(1_000_000 + i, Some(pseudo_embedding(i as u64 + 7))))
        .collect();
    c.bench_function("rank_by_basis_set_50x5000", |b| {
        b.iter(|| {
            ranker
                .rank_by_basis_set(black_box(&candidates), black_box(&basis), 15, 2.0)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_rank_against, bench_rank_by_basis_set);
criterion_main!(benches);
