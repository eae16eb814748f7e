//! # shelf-vector
//!
//! Pure numeric routines over embeddings: cosine similarity, exponential
//! recency-weighted averaging, and dimension validation.
//!
//! Embeddings are stored as `f32`; all accumulation happens in `f64`.

pub mod similarity;
pub mod weighted;

pub use similarity::{cosine_similarity, validate_dimensions};
pub use weighted::{weighted_average, WeightedEntry};
