use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review identifier. Unique and immutable once published.
pub type ReviewId = i64;

/// User identifier.
pub type UserId = i64;

/// Account state of a review's author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
    Deleted,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// Publication state of a review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    #[default]
    Published,
    Draft,
    Hidden,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
            Self::Hidden => "hidden",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "published" => Some(Self::Published),
            "draft" => Some(Self::Draft),
            "hidden" => Some(Self::Hidden),
            _ => None,
        }
    }
}

/// Viewer-relative visibility attributes, resolved by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewVisibility {
    pub author_blocked_by_viewer: bool,
    pub book_muted_by_viewer: bool,
    pub author_status: AccountStatus,
    pub status: PublicationStatus,
}

/// A review as projected from the external store for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: ReviewId,
    pub author_id: UserId,
    /// ISBN of the reviewed book.
    pub isbn: String,
    pub title: String,
    pub body: String,
    pub published_at: DateTime<Utc>,
    /// Precomputed embedding. `None` excludes the review from similarity ranking.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub visibility: ReviewVisibility,
}

impl ReviewRecord {
    /// The embedding as a slice, if present.
    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}
