//! Review ingestion pipeline.
//!
//! Turns a set of dated CSV exports into a [`ReviewSession`]: snapshot
//! totals per file plus deduplicated reviews grouped per day and product.
//! Files are processed strictly in ascending date order so the first copy
//! of a duplicated review always comes from the earliest export.

use chrono::NaiveDate;
use review_core::error::Result;
use review_core::models::RawReviewRow;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregator::{AggregateBucket, ReviewAggregator};
use crate::dedup::ReviewDeduplicator;
use crate::reader::{read_source, ReviewSource};
use crate::snapshot::{order_dated_sources, SnapshotRecord};

// ── Public types ──────────────────────────────────────────────────────────────

/// Counters describing one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    /// Files handed to the pipeline.
    pub files_seen: usize,
    /// Files dropped because their name carries no valid date.
    pub files_undated: usize,
    /// Rows read across all dated files.
    pub rows_read: u64,
    /// Rows without a review id (counted in snapshots only).
    pub rows_missing_id: u64,
    /// Rows dropped as duplicates of an earlier review.
    pub rows_duplicate: u64,
    /// Distinct reviews aggregated.
    pub unique_reviews: usize,
}

/// The result of one load: everything the query layer needs.
///
/// A session is immutable once built; a new load produces a new session that
/// replaces the old one wholesale.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    pub buckets: Vec<AggregateBucket>,
    /// One snapshot per dated file, ascending by date.
    pub snapshots: Vec<SnapshotRecord>,
    pub stats: LoadStats,
}

impl ReviewSession {
    /// `true` when the load produced neither reviews nor snapshots.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty() && self.snapshots.is_empty()
    }

    /// Earliest and latest date over buckets and snapshots.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self
            .buckets
            .iter()
            .map(|b| b.date)
            .chain(self.snapshots.iter().map(|s| s.date));

        dates.fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
    }
}

// ── SessionBuilder ────────────────────────────────────────────────────────────

/// Incremental session construction, one file at a time.
///
/// Callers must feed files in ascending date order. Nothing is visible to
/// the outside until [`SessionBuilder::finish`], so abandoning a builder
/// half-way discards the partial load.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    dedup: ReviewDeduplicator,
    aggregator: ReviewAggregator,
    snapshots: Vec<SnapshotRecord>,
    stats: LoadStats,
}

impl SessionBuilder {
    pub fn new(files_seen: usize, files_undated: usize) -> Self {
        Self {
            stats: LoadStats {
                files_seen,
                files_undated,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Ingest the parsed rows of one dated file.
    pub fn ingest(&mut self, date: NaiveDate, rows: Vec<RawReviewRow>) {
        let snapshot = SnapshotRecord::from_rows(date, &rows);
        debug!(
            "snapshot {}: {} rows, {} top",
            date, snapshot.total_reviews, snapshot.top_reviews
        );
        self.stats.rows_read += snapshot.total_reviews;
        self.snapshots.push(snapshot);

        let fresh = self.dedup.retain_new(rows);
        self.aggregator.add_rows(&fresh);
    }

    pub fn finish(self) -> ReviewSession {
        let mut stats = self.stats;
        stats.rows_missing_id = self.dedup.missing_id_count();
        stats.rows_duplicate = self.dedup.duplicate_count();
        stats.unique_reviews = self.dedup.unique_count();

        let buckets = self.aggregator.into_buckets();
        info!(
            "Loaded {} snapshots, {} unique reviews in {} buckets ({} duplicates, {} without id)",
            self.snapshots.len(),
            stats.unique_reviews,
            buckets.len(),
            stats.rows_duplicate,
            stats.rows_missing_id,
        );

        ReviewSession {
            buckets,
            snapshots: self.snapshots,
            stats,
        }
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full ingestion pipeline synchronously.
///
/// 1. Drop undated sources and sort the rest by embedded date.
/// 2. Parse each file; the first parse error aborts the whole load.
/// 3. Emit one snapshot per file, dedupe rows, aggregate the survivors.
pub fn build_session<S: ReviewSource>(sources: Vec<S>) -> Result<ReviewSession> {
    let files_seen = sources.len();
    let dated = order_dated_sources(sources);
    let mut builder = SessionBuilder::new(files_seen, files_seen - dated.len());

    for entry in &dated {
        let rows = read_source(&entry.source)?;
        builder.ingest(entry.date, rows);
    }

    Ok(builder.finish())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
