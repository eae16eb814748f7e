//! # shelf-ranking
//!
//! Ranks an in-memory candidate pool against one basis vector by cosine
//! similarity. The basis is either a single review's embedding or a
//! recency-weighted average over an ordered set of reviews.
//!
//! ## Architecture
//!
//! ```text
//! SimilarityRanker
//! ├── rank_by_basis_review    (basis looked up in the pool)
//! ├── rank_by_basis_embedding (basis fetched by the caller)
//! ├── rank_by_basis_set       (weighted basis, oldest → newest)
//! └── rank_against            (shared scorer: rayon + stable sort + top-N)
//! ```

pub mod basis;
pub mod ranker;

pub use basis::{build_basis_vector, BasisEntry};
pub use ranker::SimilarityRanker;
