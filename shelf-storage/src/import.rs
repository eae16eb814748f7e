//! JSON dataset import for seeding a database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use shelf_core::errors::ShelfResult;
use shelf_core::models::{
    AccountStatus, PublicationStatus, ReviewId, ReviewRecord, ReviewVisibility, UserId,
};

use crate::queries::{embedding_ops, review_ops};
use crate::store::SqliteStore;

/// A complete seed dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub users: Vec<DatasetUser>,
    pub reviews: Vec<DatasetReview>,
    pub views: Vec<DatasetInteraction>,
    pub likes: Vec<DatasetInteraction>,
    pub follows: Vec<DatasetFollow>,
    pub blocks: Vec<DatasetBlock>,
    pub muted_books: Vec<DatasetMute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetUser {
    pub id: UserId,
    pub handle: String,
    #[serde(default)]
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReview {
    pub id: ReviewId,
    pub author_id: UserId,
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub status: PublicationStatus,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl DatasetReview {
    fn to_record(&self) -> ReviewRecord {
        ReviewRecord {
            id: self.id,
            author_id: self.author_id,
            isbn: self.isbn.clone(),
            title: self.title.clone(),
            body: self.body.clone(),
            published_at: self.published_at,
            embedding: self.embedding.clone(),
            visibility: ReviewVisibility {
                status: self.status,
                ..ReviewVisibility::default()
            },
        }
    }
}

/// A view or like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInteraction {
    pub user_id: UserId,
    pub review_id: ReviewId,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFollow {
    pub follower_id: UserId,
    pub followee_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetBlock {
    pub blocker_id: UserId,
    pub blocked_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMute {
    pub user_id: UserId,
    pub isbn: String,
}

/// Row counts written by an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub users: usize,
    pub reviews: usize,
    pub embeddings: usize,
    pub views: usize,
    pub likes: usize,
    pub follows: usize,
    pub blocks: usize,
    pub muted_books: usize,
}

impl Dataset {
    pub fn from_json(raw: &str) -> ShelfResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl SqliteStore {
    /// Write a whole dataset in one transaction.
    ///
    /// Every embedding is dimension-checked before anything is written.
    pub async fn import(&self, dataset: &Dataset) -> ShelfResult<ImportSummary> {
        for review in &dataset.reviews {
            if let Some(embedding) = &review.embedding {
                self.check_dimensions(embedding)?;
            }
        }

        let summary = self
            .with_transaction(|conn| {
                let mut summary = ImportSummary::default();
                for user in &dataset.users {
                    review_ops::upsert_user(conn, user.id, &user.handle, user.status)?;
                    summary.users += 1;
                }
                for review in &dataset.reviews {
                    review_ops::ensure_user(conn, review.author_id)?;
                    review_ops::upsert_review(conn, &review.to_record())?;
                    summary.reviews += 1;
                    if let Some(embedding) = &review.embedding {
                        embedding_ops::upsert_embedding(conn, review.id, embedding)?;
                        summary.embeddings += 1;
                    }
                }
                for view in &dataset.views {
                    review_ops::ensure_user(conn, view.user_id)?;
                    review_ops::insert_view(conn, view.user_id, view.review_id, &view.at)?;
                    summary.views += 1;
                }
                for like in &dataset.likes {
                    review_ops::ensure_user(conn, like.user_id)?;
                    review_ops::upsert_like(conn, like.user_id, like.review_id, &like.at)?;
                    summary.likes += 1;
                }
                for follow in &dataset.follows {
                    review_ops::ensure_user(conn, follow.follower_id)?;
                    review_ops::ensure_user(conn, follow.followee_id)?;
                    review_ops::insert_follow(conn, follow.follower_id, follow.followee_id)?;
                    summary.follows += 1;
                }
                for block in &dataset.blocks {
                    review_ops::ensure_user(conn, block.blocker_id)?;
                    review_ops::ensure_user(conn, block.blocked_id)?;
                    review_ops::insert_block(conn, block.blocker_id, block.blocked_id)?;
                    summary.blocks += 1;
                }
                for mute in &dataset.muted_books {
                    review_ops::ensure_user(conn, mute.user_id)?;
                    review_ops::insert_muted_book(conn, mute.user_id, &mute.isbn)?;
                    summary.muted_books += 1;
                }
                Ok(summary)
            })
            .await?;

        info!(
            users = summary.users,
            reviews = summary.reviews,
            embeddings = summary.embeddings,
            "dataset imported"
        );
        Ok(summary)
    }
}
