use chrono::{DateTime, Duration, TimeZone, Utc};

use shelf_core::models::{
    AccountStatus, PublicationStatus, ReviewId, ReviewRecord, ReviewVisibility, UserId,
};

/// The instant every fixture is relative to: 2026-10-01T12:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// A published, visible review one day old.
pub fn make_review(id: ReviewId, author_id: UserId, embedding: Option<Vec<f32>>) -> ReviewRecord {
    let builder = review(id, author_id);
    match embedding {
        Some(e) => builder.embedding(e).build(),
        None => builder.build(),
    }
}

/// Start building a review.
pub fn review(id: ReviewId, author_id: UserId) -> ReviewBuilder {
    ReviewBuilder {
        record: ReviewRecord {
            id,
            author_id,
            isbn: format!("978-0-00-{id:06}-0"),
            title: format!("Review {id}"),
            body: String::new(),
            published_at: fixed_now() - Duration::days(1),
            embedding: None,
            visibility: ReviewVisibility::default(),
        },
    }
}

/// Fluent builder over [`ReviewRecord`].
#[derive(Debug, Clone)]
pub struct ReviewBuilder {
    record: ReviewRecord,
}

impl ReviewBuilder {
    pub fn embedding(mut self, embedding: Vec<f32>) -> Self {
        self.record.embedding = Some(embedding);
        self
    }

    pub fn isbn(mut self, isbn: &str) -> Self {
        self.record.isbn = isbn.to_string();
        self
    }

    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.published_at = at;
        self
    }

    pub fn published_days_ago(mut self, days: i64) -> Self {
        self.record.published_at = fixed_now() - Duration::days(days);
        self
    }

    pub fn blocked(mut self) -> Self {
        self.record.visibility.author_blocked_by_viewer = true;
        self
    }

    pub fn muted(mut self) -> Self {
        self.record.visibility.book_muted_by_viewer = true;
        self
    }

    pub fn status(mut self, status: PublicationStatus) -> Self {
        self.record.visibility.status = status;
        self
    }

    pub fn author_status(mut self, status: AccountStatus) -> Self {
        self.record.visibility.author_status = status;
        self
    }

    pub fn build(self) -> ReviewRecord {
        self.record
    }
}
