use crate::models::MAX_RATING;
use crate::time_utils::parse_created_timestamp;

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use review_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Render a star rating as filled and hollow stars, e.g. `"★★★★☆"`.
///
/// Ratings above the maximum are shown as a full row.
pub fn format_stars(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    let hollow = MAX_RATING as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(hollow))
}

/// Format a review timestamp as `YYYY.MM.DD`; unparseable values are
/// returned unchanged.
pub fn format_review_date(created_at: &str) -> String {
    match parse_created_timestamp(created_at) {
        Some(ts) => ts.format("%Y.%m.%d").to_string(),
        None => created_at.to_string(),
    }
}

/// Summary line shown above a review list, e.g. `"12 reviews (3 top)"`.
pub fn review_count_label(total: usize, top: usize) -> String {
    let noun = if total == 1 { "review" } else { "reviews" };
    format!(
        "{} {} ({} top)",
        format_count(total as u64),
        noun,
        format_count(top as u64)
    )
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_small() {
        assert_eq!(format_count(5), "5");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_format_count_thousands() {
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_stars() {
        assert_eq!(format_stars(0), "☆☆☆☆☆");
        assert_eq!(format_stars(3), "★★★☆☆");
        assert_eq!(format_stars(5), "★★★★★");
        assert_eq!(format_stars(9), "★★★★★");
    }

    #[test]
    fn test_format_review_date() {
        assert_eq!(format_review_date("2024-01-03 09:00"), "2024.01.03");
        assert_eq!(format_review_date("2024-01-03"), "2024.01.03");
        assert_eq!(format_review_date("soon"), "soon");
    }

    #[test]
    fn test_review_count_label() {
        assert_eq!(review_count_label(0, 0), "0 reviews (0 top)");
        assert_eq!(review_count_label(1, 1), "1 review (1 top)");
        assert_eq!(review_count_label(1_500, 20), "1,500 reviews (20 top)");
    }
}
