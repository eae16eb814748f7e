//! # shelf-aggregation
//!
//! Turns one user's activity into one ranked list per category.
//!
//! ## Pipeline
//! 1. Activity IDs for every category are fetched concurrently.
//! 2. Basis embeddings for every activity ID are fetched concurrently.
//! 3. Categories are ranked in `ActivityCategory::PRIORITY` order against a
//!    shared candidate pool. Each category only sees candidates no earlier
//!    category claimed.
//!
//! Every external call runs under a [`RequestContext`], which carries the
//! request id, the cancellation token, and the per-call timeout.

pub mod aggregator;
pub mod context;
pub mod exclusion;

pub use aggregator::{ActivityFetch, Aggregation, CategoryAggregator};
pub use context::{CancelToken, RequestContext};
pub use exclusion::{aggregate_ranked, CategoryBasis};
