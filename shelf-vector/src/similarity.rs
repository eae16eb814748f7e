//! Cosine similarity with an explicit zero-norm policy.

use shelf_core::errors::{ShelfResult, VectorError};

/// Validate that an embedding has the expected dimensions.
///
/// # Errors
/// Returns `DimensionMismatch` if dimensions don't match.
pub fn validate_dimensions(embedding: &[f32], expected: usize) -> ShelfResult<()> {
    if embedding.len() != expected {
        return Err(VectorError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        }
        .into());
    }
    Ok(())
}

/// Cosine similarity between two vectors: `dot(a, b) / (‖a‖·‖b‖)`.
///
/// If either vector has zero magnitude (including two empty vectors) the
/// similarity is `0.0`. The result is clamped to `[-1.0, 1.0]` to absorb
/// rounding.
///
/// # Errors
/// Returns `DimensionMismatch` if the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> ShelfResult<f64> {
    validate_dimensions(b, a.len())?;

    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    if mag_a == 0.0 || mag_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (mag_a.sqrt() * mag_b.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::ShelfError;

    #[test]
    fn identical_vectors_have_similarity_one() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn opposite_vectors_have_similarity_minus_one() {
        let a = vec![0.5, -2.0, 3.0];
        let b: Vec<f32> = a.iter().map(|x| -x).collect();
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim + 1.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_vectors_have_similarity_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-9);
    }

    #[test]
    fn zero_norm_returns_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn tiny_nonzero_vectors_are_not_zero_norm() {
        let v = [1e-9, 0.0];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-9);
        assert!((cosine_similarity(&v, &[-1e-9, 0.0]).unwrap() + 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&v, &[0.0, 1e-9]).unwrap(), 0.0);
    }

    #[test]
    fn subnormal_components_still_count() {
        let v = [f32::MIN_POSITIVE / 4.0, 0.0, 0.0];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_vectors_return_zero() {
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn mismatched_lengths_fail() {
        let err = cosine_similarity(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            ShelfError::VectorError(VectorError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn magnitude_does_not_change_similarity() {
        let a = [1.0, 2.0];
        let b = [10.0, 20.0];
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn validate_dimensions_accepts_exact_length() {
        assert!(validate_dimensions(&[0.0; 4], 4).is_ok());
        assert!(validate_dimensions(&[0.0; 3], 4).is_err());
    }
}
