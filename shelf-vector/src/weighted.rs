//! Exponential recency weighting: `weight_i = decay_base ^ position_i`.
//!
//! ```text
//! output[d] = Σ(weight_i · vector_i[d]) / Σ(weight_i)
//! ```
//!
//! Weights are evaluated relative to the extreme position so the largest
//! exponent is zero. The shared factor cancels in the ratio, and histories of
//! any length stay finite.

use shelf_core::errors::{ShelfResult, VectorError};

/// One input to the weighted average: a vector and its recency position
/// (0 = oldest).
#[derive(Debug, Clone, Copy)]
pub struct WeightedEntry<'a> {
    pub vector: &'a [f32],
    pub position: usize,
}

impl<'a> WeightedEntry<'a> {
    pub fn new(vector: &'a [f32], position: usize) -> Self {
        Self { vector, position }
    }
}

/// Recency-weighted mean of the given vectors.
///
/// # Errors
/// - `EmptyInput` when `entries` is empty.
/// - `DimensionMismatch` when vectors differ in length.
/// - `InvalidDecayBase` when `decay_base` is not finite and positive.
pub fn weighted_average(entries: &[WeightedEntry<'_>], decay_base: f64) -> ShelfResult<Vec<f32>> {
    if !decay_base.is_finite() || decay_base <= 0.0 {
        return Err(VectorError::InvalidDecayBase { value: decay_base }.into());
    }
    let first = entries.first().ok_or(VectorError::EmptyInput)?;
    let dims = first.vector.len();
    for entry in entries {
        if entry.vector.len() != dims {
            return Err(VectorError::DimensionMismatch {
                expected: dims,
                actual: entry.vector.len(),
            }
            .into());
        }
    }

    // Anchor on the position with the largest weight.
    let anchor = if decay_base >= 1.0 {
        entries.iter().map(|e| e.position).max()
    } else {
        entries.iter().map(|e| e.position).min()
    }
    .unwrap_or(0) as f64;

    let mut sums = vec![0.0f64; dims];
    let mut total_weight = 0.0f64;
    for entry in entries {
        let weight = decay_base.powf(entry.position as f64 - anchor);
        total_weight += weight;
        for (acc, x) in sums.iter_mut().zip(entry.vector) {
            *acc += weight * (*x as f64);
        }
    }

    // total_weight >= 1.0: the anchor entry contributes exactly 1.
    Ok(sums.into_iter().map(|s| (s / total_weight) as f32).collect())
}
