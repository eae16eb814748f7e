//! Weighted basis vectors built from ordered activity.

use shelf_core::errors::ShelfResult;
use shelf_core::models::ReviewId;
use shelf_vector::{weighted_average, WeightedEntry};

/// One basis review in oldest-first order, with its embedding if it has one.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisEntry {
    pub review_id: ReviewId,
    pub embedding: Option<Vec<f32>>,
}

impl BasisEntry {
    pub fn new(review_id: ReviewId, embedding: Option<Vec<f32>>) -> Self {
        Self {
            review_id,
            embedding,
        }
    }
}

/// Build the recency-weighted basis vector.
///
/// Each entry keeps its list position as its weight exponent, so a review
/// without an embedding is skipped without shifting the weights of the
/// others. Returns `Ok(None)` when no entry has an embedding.
pub fn build_basis_vector(basis: &[BasisEntry], decay_base: f64) -> ShelfResult<Option<Vec<f32>>> {
    let entries: Vec<WeightedEntry<'_>> = basis
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            entry
                .embedding
                .as_deref()
                .map(|v| WeightedEntry::new(v, position))
        })
        .collect();

    if entries.is_empty() {
        return Ok(None);
    }
    weighted_average(&entries, decay_base).map(Some)
}
