//! Pure filter functions over a loaded [`ReviewSession`](crate::analysis::ReviewSession).
//!
//! Nothing here holds state: every call takes the session data and the
//! filter parameters explicitly and returns fresh results.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::NaiveDate;
use review_core::models::DisplayReview;
use review_core::time_utils::{parse_created_timestamp, DateRange};
use serde::Serialize;

use crate::aggregator::AggregateBucket;
use crate::snapshot::SnapshotRecord;

/// Case-sensitive, unanchored product-id match. A blank filter matches all.
pub fn product_matches(product_id: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || product_id.contains(filter)
}

/// Buckets inside `range` (inclusive) whose product id contains `product_filter`.
pub fn filter_aggregates<'a>(
    buckets: &'a [AggregateBucket],
    range: DateRange,
    product_filter: &str,
) -> Vec<&'a AggregateBucket> {
    buckets
        .iter()
        .filter(|b| range.contains(b.date) && product_matches(&b.product_id, product_filter))
        .collect()
}

/// Snapshots inside `range` (inclusive).
pub fn filter_snapshots(snapshots: &[SnapshotRecord], range: DateRange) -> Vec<&SnapshotRecord> {
    snapshots.iter().filter(|s| range.contains(s.date)).collect()
}

/// Flatten the review lists of `buckets`, tagging each review with its
/// bucket's product id and item name. With `top_only`, reviews without a
/// reviewer rank are dropped.
pub fn expand_reviews<'a, I>(buckets: I, top_only: bool) -> Vec<DisplayReview>
where
    I: IntoIterator<Item = &'a AggregateBucket>,
{
    buckets
        .into_iter()
        .flat_map(|bucket| {
            bucket
                .reviews()
                .iter()
                .filter(move |r| !top_only || r.is_top())
                .map(move |r| DisplayReview {
                    product_id: bucket.product_id.clone(),
                    item_name: bucket.item_name.clone(),
                    review: r.clone(),
                })
        })
        .collect()
}

/// Reviews of a single creation day, for drill-down from a chart point.
pub fn filter_by_exact_date(
    buckets: &[AggregateBucket],
    target: NaiveDate,
    product_filter: &str,
    top_only: bool,
) -> Vec<DisplayReview> {
    let matching = buckets
        .iter()
        .filter(|b| b.date == target && product_matches(&b.product_id, product_filter));
    expand_reviews(matching, top_only)
}

/// Order reviews newest first. Reviews whose timestamp cannot be parsed go
/// last, keeping their relative order.
pub fn sort_by_recency(reviews: &mut [DisplayReview]) {
    reviews.sort_by_cached_key(|r| Reverse(parse_created_timestamp(&r.review.created_at)));
}

/// `(total, top)` counts of a review list.
pub fn review_counts(reviews: &[DisplayReview]) -> (usize, usize) {
    let top = reviews.iter().filter(|r| r.is_top()).count();
    (reviews.len(), top)
}

// ── Product summary ───────────────────────────────────────────────────────────

/// Number of reviews per product within a filtered bucket set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCount {
    pub product_id: String,
    pub reviews: u64,
}

/// Review counts per product, most reviewed first (ties by product id).
pub fn product_summary<'a, I>(buckets: I) -> Vec<ProductCount>
where
    I: IntoIterator<Item = &'a AggregateBucket>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for bucket in buckets {
        *counts.entry(bucket.product_id.as_str()).or_insert(0) += bucket.reviews().len() as u64;
    }

    let mut summary: Vec<ProductCount> = counts
        .into_iter()
        .map(|(product_id, reviews)| ProductCount {
            product_id: product_id.to_string(),
            reviews,
        })
        .collect();
    summary.sort_by(|a, b| {
        b.reviews
            .cmp(&a.reviews)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    summary
}

// ── Tests ─────────────────────────────────────────────────────────────────────
