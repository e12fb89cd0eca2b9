//! Dense day-by-day count series for the trend charts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use review_core::time_utils::{format_day, DateRange};
use serde::Serialize;

use crate::aggregator::AggregateBucket;
use crate::snapshot::SnapshotRecord;

// ── DatedCounts ───────────────────────────────────────────────────────────────

/// Anything that contributes a total and a top count to one calendar day.
pub trait DatedCounts {
    fn date(&self) -> NaiveDate;
    fn total(&self) -> u64;
    fn top(&self) -> u64;
}

impl DatedCounts for AggregateBucket {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn total(&self) -> u64 {
        self.total_reviews()
    }
    fn top(&self) -> u64 {
        self.top_reviews()
    }
}

impl DatedCounts for SnapshotRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn total(&self) -> u64 {
        self.total_reviews
    }
    fn top(&self) -> u64 {
        self.top_reviews
    }
}

impl<T: DatedCounts + ?Sized> DatedCounts for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
    fn total(&self) -> u64 {
        (**self).total()
    }
    fn top(&self) -> u64 {
        (**self).top()
    }
}

// ── DailySeries ───────────────────────────────────────────────────────────────

/// Parallel arrays of day labels and counts, ascending by day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    pub labels: Vec<String>,
    pub totals: Vec<u64>,
    pub tops: Vec<u64>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Largest total in the series, 0 when empty.
    pub fn max_total(&self) -> u64 {
        self.totals.iter().copied().max().unwrap_or(0)
    }

    /// Day at position `index`, if any.
    pub fn day_at(&self, index: usize) -> Option<NaiveDate> {
        self.labels
            .get(index)
            .and_then(|l| NaiveDate::parse_from_str(l, "%Y-%m-%d").ok())
    }
}

/// Build a zero-filled series with one point per day of `range`.
///
/// Each item is added to its own day; items outside the range are ignored.
pub fn daily_series<I>(items: I, range: DateRange) -> DailySeries
where
    I: IntoIterator,
    I::Item: DatedCounts,
{
    let mut counters: BTreeMap<NaiveDate, (u64, u64)> =
        range.days().map(|d| (d, (0, 0))).collect();

    for item in items {
        if let Some((total, top)) = counters.get_mut(&item.date()) {
            *total += item.total();
            *top += item.top();
        }
    }

    let mut series = DailySeries::default();
    for (day, (total, top)) in counters {
        series.labels.push(format_day(day));
        series.totals.push(total);
        series.tops.push(top);
    }
    series
}

// ── ChartTimeUnit ─────────────────────────────────────────────────────────────

/// Axis granularity for a chart, chosen from the width of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartTimeUnit {
    Day,
    Week,
    Month,
}

impl ChartTimeUnit {
    /// More than 90 days → month, more than 30 → week, else day.
    pub fn for_range(range: DateRange) -> Self {
        let span = (range.end() - range.start()).num_days();
        if span > 90 {
            ChartTimeUnit::Month
        } else if span > 30 {
            ChartTimeUnit::Week
        } else {
            ChartTimeUnit::Day
        }
    }

    /// Label format for axis ticks at this granularity.
    pub fn tick_format(&self) -> &'static str {
        match self {
            ChartTimeUnit::Day | ChartTimeUnit::Week => "%b %-d",
            ChartTimeUnit::Month => "%Y %b",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
