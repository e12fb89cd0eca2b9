//! Filter state and the derived dashboard view model.
//!
//! [`DashboardView::build`] is the single render pass: given the committed
//! session and the current [`FilterState`] it produces everything the
//! terminal dashboard and the JSON output show. It is recomputed from scratch
//! on every filter change.

use chrono::NaiveDate;
use review_core::formatting::review_count_label;
use review_core::models::DisplayReview;
use review_core::time_utils::DateRange;
use review_data::analysis::{LoadStats, ReviewSession};
use review_data::query::{
    expand_reviews, filter_aggregates, filter_by_exact_date, filter_snapshots, product_summary,
    review_counts, sort_by_recency, ProductCount,
};
use review_data::series::{daily_series, ChartTimeUnit, DailySeries};
use serde::Serialize;

// ── FilterState ───────────────────────────────────────────────────────────────

/// User-controlled filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Explicit date range; `None` means the session's full date bounds.
    pub range: Option<DateRange>,
    /// Product-id substring, applied after trimming.
    pub product_filter: String,
    /// Show only reviews written by ranked reviewers.
    pub top_only: bool,
    /// Restrict the review list to one creation day.
    pub drill_date: Option<NaiveDate>,
}

impl FilterState {
    /// Range actually applied: the explicit one, else the session bounds.
    pub fn effective_range(&self, session: &ReviewSession) -> Option<DateRange> {
        self.range
            .or_else(|| session.date_bounds().map(|(lo, hi)| DateRange::new(lo, hi)))
    }

    /// Pin the range from optional `--from`/`--to` values, filling a missing
    /// end from the session bounds.
    pub fn apply_bounds(
        &mut self,
        session: &ReviewSession,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) {
        if from.is_none() && to.is_none() {
            return;
        }
        let bounds = session.date_bounds();
        let start = from.or(bounds.map(|(lo, _)| lo));
        let end = to.or(bounds.map(|(_, hi)| hi));
        if let (Some(start), Some(end)) = (start, end) {
            self.range = Some(DateRange::new(start, end));
        }
    }
}

// ── DashboardView ─────────────────────────────────────────────────────────────

/// Everything one dashboard frame displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub range: DateRange,
    pub product_filter: String,
    pub top_only: bool,
    pub drill_date: Option<NaiveDate>,
    pub time_unit: ChartTimeUnit,
    /// Newly created reviews per day (deduplicated aggregate).
    pub new_reviews: DailySeries,
    /// Cumulative totals per snapshot file date.
    pub snapshots: DailySeries,
    pub products: Vec<ProductCount>,
    /// Newest first.
    pub reviews: Vec<DisplayReview>,
    pub review_total: usize,
    pub review_top: usize,
    pub counts_label: String,
    pub stats: LoadStats,
}

impl DashboardView {
    /// Build the view, or `None` when there is no range to show (an empty
    /// session with no explicit range).
    pub fn build(session: &ReviewSession, filter: &FilterState) -> Option<Self> {
        let range = filter.effective_range(session)?;
        let product_filter = filter.product_filter.trim().to_string();

        let buckets = filter_aggregates(&session.buckets, range, &product_filter);
        let snapshots = filter_snapshots(&session.snapshots, range);

        let mut reviews = match filter.drill_date {
            Some(day) => {
                filter_by_exact_date(&session.buckets, day, &product_filter, filter.top_only)
            }
            None => expand_reviews(buckets.iter().copied(), filter.top_only),
        };
        sort_by_recency(&mut reviews);
        let (review_total, review_top) = review_counts(&reviews);

        Some(Self {
            range,
            top_only: filter.top_only,
            drill_date: filter.drill_date,
            time_unit: ChartTimeUnit::for_range(range),
            new_reviews: daily_series(&buckets, range),
            snapshots: daily_series(&snapshots, range),
            products: product_summary(buckets.iter().copied()),
            counts_label: review_count_label(review_total, review_top),
            reviews,
            review_total,
            review_top,
            product_filter,
            stats: session.stats.clone(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
