//! Per-file snapshot totals.
//!
//! Every dated export is an independent point-in-time view of the review
//! list, so its snapshot is computed from its own rows only.

use chrono::NaiveDate;
use review_core::models::RawReviewRow;
use review_core::time_utils::extract_file_date;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::reader::ReviewSource;

/// Review totals as of one export file's date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub date: NaiveDate,
    pub total_reviews: u64,
    pub top_reviews: u64,
}

impl SnapshotRecord {
    /// Count all rows of one file, including rows without a review id.
    pub fn from_rows(date: NaiveDate, rows: &[RawReviewRow]) -> Self {
        Self {
            date,
            total_reviews: rows.len() as u64,
            top_reviews: rows.iter().filter(|r| r.is_top()).count() as u64,
        }
    }
}

/// A source paired with the date embedded in its name.
#[derive(Debug, Clone)]
pub struct DatedSource<S> {
    pub date: NaiveDate,
    pub source: S,
}

/// Keep only sources whose name embeds a valid `YYYYMMDD` date and order
/// them by that date, ascending.
///
/// The sort is stable, so two files carrying the same date keep their input
/// order. Undated files are dropped without error.
pub fn order_dated_sources<S: ReviewSource>(sources: Vec<S>) -> Vec<DatedSource<S>> {
    let mut dated: Vec<DatedSource<S>> = sources
        .into_iter()
        .filter_map(|source| match extract_file_date(source.name()) {
            Some(date) => Some(DatedSource { date, source }),
            None => {
                debug!("skipping undated file {}", source.name());
                None
            }
        })
        .collect();

    dated.sort_by_key(|d| d.date);
    dated
}

// ── Tests ─────────────────────────────────────────────────────────────────────
