//! # shelf-recommend
//!
//! Builds the personalized feed. [`RecommendationEngine`] fetches activity,
//! aggregates per-category rankings, and interleaves them with
//! [`composer::round_robin`]. Anonymous users and users without activity get
//! a shuffled sample of recent reviews instead.

pub mod composer;
pub mod engine;
pub mod feed;

pub use composer::{compose, recent_shuffled, round_robin};
pub use engine::RecommendationEngine;
pub use feed::RecommendationFeed;
