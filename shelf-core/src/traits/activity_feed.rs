use crate::errors::ShelfResult;
use crate::models::{ActivityCategory, ReviewId, UserId};

/// Activity-log source.
pub trait IActivityFeed: Send + Sync {
    /// Review IDs the user interacted with in one category, oldest first.
    async fn review_ids(
        &self,
        user_id: UserId,
        category: ActivityCategory,
    ) -> ShelfResult<Vec<ReviewId>>;
}
