/// Upper bound on any single requested list length.
pub const MAX_FEED_LIMIT: usize = 500;

/// Upper bound on `storage.activity_history_limit`.
///
/// Seen-review exclusion binds one SQL parameter per activity id across all
/// four categories; this keeps that well under SQLite's variable cap.
pub const MAX_ACTIVITY_HISTORY: usize = 1000;
