//! SQL for every store operation. Each function takes a borrowed connection.

pub mod activity_ops;
pub mod candidate_ops;
pub mod embedding_ops;
pub mod review_ops;

use chrono::{DateTime, SecondsFormat, Utc};

use shelf_core::errors::ShelfResult;

use crate::to_storage_err;

/// Fixed-width UTC timestamps so text comparison matches time order.
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> ShelfResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("invalid timestamp {raw:?}: {e}")))
}
