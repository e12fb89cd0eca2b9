//! Per-day, per-product aggregation of deduplicated reviews.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use review_core::models::{RawReviewRow, ReviewRecord, UNKNOWN_ITEM_NAME};
use review_core::time_utils::created_bucket_date;
use serde::Serialize;

// ── BucketKey ─────────────────────────────────────────────────────────────────

/// Composite grouping key: review creation day and product id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketKey {
    pub date: NaiveDate,
    pub product_id: String,
}

impl BucketKey {
    /// Key for a row: creation day (epoch fallback) and product id ("N/A"
    /// fallback).
    pub fn for_row(row: &RawReviewRow) -> Self {
        Self {
            date: created_bucket_date(&row.created_at),
            product_id: row.product_key().to_string(),
        }
    }
}

// ── AggregateBucket ───────────────────────────────────────────────────────────

/// All reviews created on one day for one product.
///
/// Counts are derived while the bucket is built and cannot be changed
/// afterwards: `total_reviews == reviews.len()` and `top_reviews` is the
/// number of reviews with a non-blank reviewer rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateBucket {
    pub date: NaiveDate,
    pub product_id: String,
    /// Item name of the first row seen for this key.
    pub item_name: String,
    total_reviews: u64,
    top_reviews: u64,
    reviews: Vec<ReviewRecord>,
}

impl AggregateBucket {
    fn new(key: &BucketKey, first: &RawReviewRow) -> Self {
        let item_name = if first.item_name.is_empty() {
            UNKNOWN_ITEM_NAME.to_string()
        } else {
            first.item_name.clone()
        };
        Self {
            date: key.date,
            product_id: key.product_id.clone(),
            item_name,
            total_reviews: 0,
            top_reviews: 0,
            reviews: Vec::new(),
        }
    }

    fn push(&mut self, row: &RawReviewRow) {
        self.total_reviews += 1;
        if row.is_top() {
            self.top_reviews += 1;
        }
        self.reviews.push(ReviewRecord::from(row));
    }

    pub fn key(&self) -> BucketKey {
        BucketKey {
            date: self.date,
            product_id: self.product_id.clone(),
        }
    }

    pub fn total_reviews(&self) -> u64 {
        self.total_reviews
    }

    pub fn top_reviews(&self) -> u64 {
        self.top_reviews
    }

    pub fn reviews(&self) -> &[ReviewRecord] {
        &self.reviews
    }
}

// ── ReviewAggregator ──────────────────────────────────────────────────────────

/// Groups the deduplicated row stream into [`AggregateBucket`]s.
#[derive(Debug, Default)]
pub struct ReviewAggregator {
    buckets: BTreeMap<BucketKey, AggregateBucket>,
}

impl ReviewAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one deduplicated row to its bucket, creating the bucket on first
    /// sight of the key.
    pub fn add_row(&mut self, row: &RawReviewRow) {
        let key = BucketKey::for_row(row);
        self.buckets
            .entry(key)
            .or_insert_with_key(|k| AggregateBucket::new(k, row))
            .push(row);
    }

    pub fn add_rows<'a>(&mut self, rows: impl IntoIterator<Item = &'a RawReviewRow>) {
        for row in rows {
            self.add_row(row);
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Finish aggregation. Buckets come out ordered by key, but callers
    /// should treat the collection as unordered.
    pub fn into_buckets(self) -> Vec<AggregateBucket> {
        self.buckets.into_values().collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
