use std::sync::OnceLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ReviewError};

/// Canonical `YYYY-MM-DD` day format used for labels and bucket keys.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Bucket date assigned to reviews whose `createdAt` is missing or unparseable.
pub fn epoch_fallback_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

// ── Filename dates ────────────────────────────────────────────────────────────

fn file_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{8}").expect("regex is valid"))
}

/// Extract the snapshot date embedded in an export file name.
///
/// Only the first run of 8 ASCII digits is considered and it must form a valid
/// `YYYYMMDD` calendar date; otherwise `None` is returned and the file is not
/// a dated snapshot.
pub fn extract_file_date(file_name: &str) -> Option<NaiveDate> {
    let digits = file_date_regex().find(file_name)?.as_str();
    match NaiveDate::parse_from_str(digits, "%Y%m%d") {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("file name \"{}\" has no valid date ({})", file_name, e);
            None
        }
    }
}

// ── Review timestamps ─────────────────────────────────────────────────────────

/// Calendar day of a review's `createdAt` value.
///
/// The date portion is everything before the first space or `T`, parsed as
/// `YYYY-MM-DD`. Returns `None` for blank or unparseable input.
pub fn parse_created_date(created_at: &str) -> Option<NaiveDate> {
    let trimmed = created_at.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = trimmed.split([' ', 'T']).next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DAY_FORMAT).ok()
}

/// Bucket day for a review, falling back to 1970-01-01.
pub fn created_bucket_date(created_at: &str) -> NaiveDate {
    parse_created_date(created_at).unwrap_or_else(|| {
        debug!(
            "createdAt \"{}\" unparseable, using epoch bucket",
            created_at
        );
        epoch_fallback_date()
    })
}

/// Full timestamp of a review's `createdAt`, used for recency ordering.
///
/// Accepts the usual export layouts with or without seconds; a bare date is
/// treated as midnight.
pub fn parse_created_timestamp(created_at: &str) -> Option<NaiveDateTime> {
    const FMTS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    let trimmed = created_at.trim();
    for fmt in FMTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(ts);
        }
    }
    parse_created_date(trimmed).and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ── User input ────────────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` date given on the command line or in the dashboard.
pub fn parse_user_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DAY_FORMAT)
        .map_err(|_| ReviewError::InvalidDate(s.to_string()))
}

/// Format a day as `YYYY-MM-DD`.
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

// ── DateRange ─────────────────────────────────────────────────────────────────

/// Inclusive calendar-day range.
///
/// Membership is day-granular: a date `d` is inside when
/// `start <= d <= end`, which is the same as testing the start of the first
/// day against the end of the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range from two endpoints given in either order.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A range covering exactly one day.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive membership test.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the range (at least 1).
    pub fn len_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Iterate every day from `start` to `end` inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.len_days() as i64).map(move |offset| start + Duration::days(offset))
    }

    /// Move the start by `days`, never past the end.
    pub fn shift_start(&self, days: i64) -> Self {
        let start = (self.start + Duration::days(days)).min(self.end);
        Self { start, end: self.end }
    }

    /// Move the end by `days`, never before the start.
    pub fn shift_end(&self, days: i64) -> Self {
        let end = (self.end + Duration::days(days)).max(self.start);
        Self { start: self.start, end }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
