use crate::errors::ShelfResult;
use crate::models::{CandidateQuery, ReviewId, ReviewRecord};

/// Review-data source: embeddings and visibility-filtered candidate pools.
///
/// Serialization of vectors is the implementation's concern; callers only
/// ever see decoded `f32` sequences of the deployment's fixed dimensionality.
pub trait IEmbeddingStore: Send + Sync {
    /// Embedding of one review. `None` if the review has no embedding or does not exist.
    async fn fetch_embedding(&self, review_id: ReviewId) -> ShelfResult<Option<Vec<f32>>>;

    /// Reviews matching the query, in the query's sort order.
    async fn fetch_candidate_pool(&self, query: &CandidateQuery) -> ShelfResult<Vec<ReviewRecord>>;
}
