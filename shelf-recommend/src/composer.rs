//! Feed composition: round-robin interleaving and the randomized recent fallback.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use shelf_core::models::{CategoryRanking, Recommendation, RecommendationSource, ReviewRecord};

/// Interleave `lists`: element 0 of each list in order, then element 1, and so on.
///
/// Exhausted lists are skipped. Stops at `limit` items or when every list is
/// exhausted.
pub fn round_robin<T: Clone>(lists: &[Vec<T>], limit: usize) -> Vec<T> {
    let longest = lists.iter().map(Vec::len).max().unwrap_or(0);
    let mut out = Vec::with_capacity(limit.min(lists.iter().map(Vec::len).sum()));

    'rounds: for index in 0..longest {
        for list in lists {
            if out.len() >= limit {
                break 'rounds;
            }
            if let Some(item) = list.get(index) {
                out.push(item.clone());
            }
        }
    }
    out
}

/// Interleave per-category rankings, in the order given, into feed items.
pub fn compose(rankings: &[CategoryRanking], limit: usize) -> Vec<Recommendation> {
    let lists: Vec<Vec<Recommendation>> = rankings
        .iter()
        .map(|ranking| {
            ranking
                .ranked
                .iter()
                .map(|r| Recommendation {
                    review_id: r.review_id,
                    author_id: r.author_id,
                    similarity: Some(r.similarity),
                    source: RecommendationSource::Category(ranking.category),
                })
                .collect()
        })
        .collect();
    round_robin(&lists, limit)
}

/// Uniformly shuffled sample of the candidates published within `window` of `now`.
pub fn recent_shuffled<R: Rng + ?Sized>(
    candidates: Vec<ReviewRecord>,
    now: DateTime<Utc>,
    window: Duration,
    limit: usize,
    rng: &mut R,
) -> Vec<ReviewRecord> {
    let since = now - window;
    let mut recent: Vec<ReviewRecord> = candidates
        .into_iter()
        .filter(|r| r.published_at >= since)
        .collect();
    recent.shuffle(rng);
    recent.truncate(limit);
    recent
}
