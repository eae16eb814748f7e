use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::review::{ReviewId, UserId};

/// Interaction categories that feed recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    /// Reviews the user opened.
    Viewed,
    /// Reviews written by authors the user follows.
    FollowedAuthorReview,
    /// Reviews the user liked.
    Liked,
    /// Reviews the user wrote.
    OwnReview,
}

impl ActivityCategory {
    /// Processing order for the aggregator and the composer, most personal signal first.
    pub const PRIORITY: [ActivityCategory; 4] = [
        ActivityCategory::Viewed,
        ActivityCategory::FollowedAuthorReview,
        ActivityCategory::Liked,
        ActivityCategory::OwnReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewed => "viewed",
            Self::FollowedAuthorReview => "followed_author_review",
            Self::Liked => "liked",
            Self::OwnReview => "own_review",
        }
    }
}

impl std::fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub user_id: UserId,
    pub review_id: ReviewId,
    pub category: ActivityCategory,
    pub occurred_at: DateTime<Utc>,
}

/// Oldest-first review IDs per category for one user, as fetched for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitySnapshot {
    lists: Vec<(ActivityCategory, Vec<ReviewId>)>,
}

impl ActivitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the list for a category, replacing any previous one.
    pub fn insert(&mut self, category: ActivityCategory, review_ids: Vec<ReviewId>) {
        match self.lists.iter_mut().find(|(c, _)| *c == category) {
            Some((_, ids)) => *ids = review_ids,
            None => self.lists.push((category, review_ids)),
        }
    }

    /// Oldest-first IDs for a category (empty if none were recorded or fetched).
    pub fn review_ids(&self, category: ActivityCategory) -> &[ReviewId] {
        self.lists
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, ids)| ids.as_slice())
            .unwrap_or(&[])
    }

    /// True when no category has any activity.
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(|(_, ids)| ids.is_empty())
    }

    /// Every ID across all categories, first occurrence order, without duplicates.
    pub fn all_review_ids(&self) -> Vec<ReviewId> {
        let mut seen = std::collections::HashSet::new();
        ActivityCategory::PRIORITY
            .iter()
            .flat_map(|c| self.review_ids(*c).iter().copied())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
