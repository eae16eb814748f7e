use std::collections::HashSet;

use chrono::{Duration, TimeZone, Utc};
use shelf_core::models::*;

fn review(id: ReviewId, author: UserId, days_old: i64, embedding: Option<Vec<f32>>) -> ReviewRecord {
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
    ReviewRecord {
        id,
        author_id: author,
        isbn: format!("978000000{id:04}"),
        title: format!("Review {id}"),
        body: String::new(),
        published_at: now - Duration::days(days_old),
        embedding,
        visibility: ReviewVisibility::default(),
    }
}

#[test]
fn activity_snapshot_defaults_to_empty() {
    let snapshot = ActivitySnapshot::new();
    assert!(snapshot.is_empty());
    assert!(snapshot.review_ids(ActivityCategory::Viewed).is_empty());
}

#[test]
fn activity_snapshot_with_only_empty_lists_is_empty() {
    let mut snapshot = ActivitySnapshot::new();
    snapshot.insert(ActivityCategory::Liked, vec![]);
    assert!(snapshot.is_empty());
}

#[test]
fn activity_snapshot_insert_replaces() {
    let mut snapshot = ActivitySnapshot::new();
    snapshot.insert(ActivityCategory::Viewed, vec![1, 2]);
    snapshot.insert(ActivityCategory::Viewed, vec![3]);
    assert_eq!(snapshot.review_ids(ActivityCategory::Viewed), &[3]);
}

#[test]
fn activity_snapshot_all_ids_dedups_in_priority_order() {
    let mut snapshot = ActivitySnapshot::new();
    snapshot.insert(ActivityCategory::Liked, vec![5, 1]);
    snapshot.insert(ActivityCategory::Viewed, vec![1, 2]);
    assert_eq!(snapshot.all_review_ids(), vec![1, 2, 5]);
}

#[test]
fn priority_order_is_viewed_followed_liked_own() {
    assert_eq!(
        ActivityCategory::PRIORITY,
        [
            ActivityCategory::Viewed,
            ActivityCategory::FollowedAuthorReview,
            ActivityCategory::Liked,
            ActivityCategory::OwnReview,
        ]
    );
}

#[test]
fn visibility_filter_hides_blocked_and_muted() {
    let filter = VisibilityFilter::for_viewer(Some(7));
    let mut r = review(1, 2, 0, None);
    assert!(filter.admits(&r));

    r.visibility.author_blocked_by_viewer = true;
    assert!(!filter.admits(&r));

    r.visibility.author_blocked_by_viewer = false;
    r.visibility.book_muted_by_viewer = true;
    assert!(!filter.admits(&r));
}

#[test]
fn visibility_filter_hides_unpublished_and_inactive_authors() {
    let filter = VisibilityFilter::default();
    let mut r = review(1, 2, 0, None);
    r.visibility.status = PublicationStatus::Draft;
    assert!(!filter.admits(&r));

    r.visibility.status = PublicationStatus::Published;
    r.visibility.author_status = AccountStatus::Suspended;
    assert!(!filter.admits(&r));
}

#[test]
fn candidate_query_excludes_ids_author_and_missing_embeddings() {
    let reviews = vec![
        review(1, 10, 1, Some(vec![1.0, 0.0])),
        review(2, 11, 2, Some(vec![0.0, 1.0])),
        review(3, 99, 3, Some(vec![1.0, 1.0])),
        review(4, 12, 4, None),
    ];
    let query = CandidateQuery::similarity_pool(Some(99))
        .excluding([1])
        .excluding_author(Some(99));
    let ids: Vec<ReviewId> = query.apply(&reviews).iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn candidate_query_recent_pool_keeps_unembedded_and_respects_window() {
    let reviews = vec![
        review(1, 10, 1, None),
        review(2, 11, 40, None),
        review(3, 12, 5, Some(vec![1.0])),
    ];
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
    let query = CandidateQuery::recent_pool(None, now - Duration::days(30));
    let ids: Vec<ReviewId> = query.apply(&reviews).iter().map(|r| r.id).collect();
    // Newest first, review 2 is outside the window.
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn candidate_query_sorts_and_limits() {
    let reviews = vec![
        review(5, 1, 3, Some(vec![1.0])),
        review(2, 1, 1, Some(vec![1.0])),
        review(9, 1, 2, Some(vec![1.0])),
    ];
    let mut query = CandidateQuery {
        sort: CandidateSort::Oldest,
        ..CandidateQuery::default()
    };
    let ids: Vec<ReviewId> = query.apply(&reviews).iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![5, 9, 2]);

    query.sort = CandidateSort::Id;
    query.limit = Some(2);
    let ids: Vec<ReviewId> = query.apply(&reviews).iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 5]);
}

#[test]
fn candidate_query_admits_checks_exclusion_set() {
    let r = review(1, 10, 0, Some(vec![1.0]));
    let query = CandidateQuery::default();
    let mut excluded = HashSet::new();
    assert!(query.admits(&r, &excluded));
    excluded.insert(1);
    assert!(!query.admits(&r, &excluded));
}

#[test]
fn review_record_deserializes_without_optional_fields() {
    let json = r#"{
        "id": 1,
        "author_id": 2,
        "isbn": "9780000000001",
        "title": "t",
        "body": "b",
        "published_at": "2026-09-01T00:00:00Z"
    }"#;
    let r: ReviewRecord = serde_json::from_str(json).unwrap();
    assert!(r.embedding.is_none());
    assert_eq!(r.visibility, ReviewVisibility::default());
}
