use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::review::{AccountStatus, PublicationStatus, ReviewId, ReviewRecord, UserId};

/// Visibility rules applied by the store on behalf of a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityFilter {
    /// Viewer the blocked/muted relations are resolved against. `None` for anonymous.
    pub viewer: Option<UserId>,
    pub hide_blocked_authors: bool,
    pub hide_muted_books: bool,
    pub published_only: bool,
    pub active_authors_only: bool,
}

impl VisibilityFilter {
    /// Full filtering for a (possibly anonymous) viewer.
    pub fn for_viewer(viewer: Option<UserId>) -> Self {
        Self {
            viewer,
            ..Self::default()
        }
    }

    /// Whether a record passes every enabled rule.
    pub fn admits(&self, review: &ReviewRecord) -> bool {
        let vis = &review.visibility;
        if self.hide_blocked_authors && vis.author_blocked_by_viewer {
            return false;
        }
        if self.hide_muted_books && vis.book_muted_by_viewer {
            return false;
        }
        if self.published_only && vis.status != PublicationStatus::Published {
            return false;
        }
        if self.active_authors_only && vis.author_status != AccountStatus::Active {
            return false;
        }
        true
    }
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self {
            viewer: None,
            hide_blocked_authors: true,
            hide_muted_books: true,
            published_only: true,
            active_authors_only: true,
        }
    }
}

/// Ordering of a candidate pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSort {
    #[default]
    Newest,
    Oldest,
    Id,
}

/// The single parameterized candidate-fetch request.
///
/// Covers every "select reviews with some filter" variant: similar-review pools,
/// recommendation pools, and recent-item fallback pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateQuery {
    pub exclude_ids: Vec<ReviewId>,
    /// Drop reviews written by this user.
    pub exclude_author: Option<UserId>,
    /// Only reviews published at or after this instant.
    pub published_since: Option<DateTime<Utc>>,
    pub visibility: VisibilityFilter,
    pub sort: CandidateSort,
    /// Only reviews that carry an embedding.
    pub require_embedding: bool,
    pub limit: Option<usize>,
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            exclude_ids: Vec::new(),
            exclude_author: None,
            published_since: None,
            visibility: VisibilityFilter::default(),
            sort: CandidateSort::default(),
            require_embedding: true,
            limit: None,
        }
    }
}

impl CandidateQuery {
    /// Pool for similarity ranking on behalf of `viewer`.
    pub fn similarity_pool(viewer: Option<UserId>) -> Self {
        Self {
            visibility: VisibilityFilter::for_viewer(viewer),
            ..Self::default()
        }
    }

    /// Pool of recent reviews for the randomized fallback. Embeddings are not needed.
    pub fn recent_pool(viewer: Option<UserId>, since: DateTime<Utc>) -> Self {
        Self {
            published_since: Some(since),
            visibility: VisibilityFilter::for_viewer(viewer),
            sort: CandidateSort::Newest,
            require_embedding: false,
            ..Self::default()
        }
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = ReviewId>) -> Self {
        self.exclude_ids.extend(ids);
        self
    }

    pub fn excluding_author(mut self, author: Option<UserId>) -> Self {
        self.exclude_author = author;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate every rule except sort and limit against a record.
    ///
    /// Stores that cannot push the query down (in-memory catalogs) use this directly.
    pub fn admits(&self, review: &ReviewRecord, excluded: &HashSet<ReviewId>) -> bool {
        if excluded.contains(&review.id) {
            return false;
        }
        if self.exclude_author == Some(review.author_id) {
            return false;
        }
        if let Some(since) = self.published_since {
            if review.published_at < since {
                return false;
            }
        }
        if self.require_embedding && !review.has_embedding() {
            return false;
        }
        self.visibility.admits(review)
    }

    /// Filter, sort, and truncate an in-memory set of records.
    pub fn apply<'a, I>(&self, reviews: I) -> Vec<ReviewRecord>
    where
        I: IntoIterator<Item = &'a ReviewRecord>,
    {
        let excluded: HashSet<ReviewId> = self.exclude_ids.iter().copied().collect();
        let mut out: Vec<ReviewRecord> = reviews
            .into_iter()
            .filter(|r| self.admits(r, &excluded))
            .cloned()
            .collect();

        match self.sort {
            CandidateSort::Newest => out.sort_by(|a, b| {
                b.published_at
                    .cmp(&a.published_at)
                    .then_with(|| b.id.cmp(&a.id))
            }),
            CandidateSort::Oldest => out.sort_by(|a, b| {
                a.published_at
                    .cmp(&b.published_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            CandidateSort::Id => out.sort_by_key(|r| r.id),
        }

        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}
