use serde::{Deserialize, Serialize};
use tracing::debug;

/// Display name used when a review has no author name.
pub const ANONYMOUS_DISPLAY_NAME: &str = "anonymous";
/// Vendor name used when a review has no vendor.
pub const UNKNOWN_VENDOR: &str = "unknown";
/// Product id used when a row has no `productId`.
pub const MISSING_PRODUCT_ID: &str = "N/A";
/// Item name used when the first row of a bucket has no `itemName`.
pub const UNKNOWN_ITEM_NAME: &str = "unknown item";

/// Highest star rating a review can carry.
pub const MAX_RATING: u8 = 5;

/// `true` when a reviewer rank marks a top reviewer (non-blank after trim).
pub fn is_top_rank(rank: &str) -> bool {
    !rank.trim().is_empty()
}

/// One record of a review export, exactly as it appears in the CSV.
///
/// Every column is optional; an absent column deserialises as an empty
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawReviewRow {
    pub review_id: String,
    pub product_id: String,
    pub item_name: String,
    pub created_at: String,
    pub rating: String,
    pub content: String,
    pub helpful_true_count: String,
    pub attachments: String,
    pub display_name: String,
    pub vendor_name: String,
    pub reviewer_rank: String,
}

impl RawReviewRow {
    /// Whether this row was written by a top reviewer.
    pub fn is_top(&self) -> bool {
        is_top_rank(&self.reviewer_rank)
    }

    /// The id used for cross-file deduplication, `None` when blank.
    ///
    /// Ids are compared exactly as exported; `"A"` and `" A"` are different
    /// reviews.
    pub fn dedup_id(&self) -> Option<&str> {
        if self.review_id.trim().is_empty() {
            None
        } else {
            Some(&self.review_id)
        }
    }

    /// Product id with the `"N/A"` sentinel applied.
    pub fn product_key(&self) -> &str {
        if self.product_id.is_empty() {
            MISSING_PRODUCT_ID
        } else {
            &self.product_id
        }
    }
}

/// An image attached to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Source URL of the full-size image.
    #[serde(rename = "imgSrcOrigin", default)]
    pub img_src_origin: String,
}

/// Normalised view of a [`RawReviewRow`] with parsed numbers and defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub review_id: String,
    /// Star rating, 0 when absent or unparseable.
    pub rating: u8,
    pub content: String,
    pub helpful_true_count: u64,
    pub attachments: Vec<Attachment>,
    pub created_at: String,
    pub display_name: String,
    pub vendor_name: String,
    /// Empty when the author is not a top reviewer.
    pub reviewer_rank: String,
}

impl ReviewRecord {
    pub fn is_top(&self) -> bool {
        is_top_rank(&self.reviewer_rank)
    }
}

impl From<&RawReviewRow> for ReviewRecord {
    fn from(row: &RawReviewRow) -> Self {
        Self {
            review_id: row.review_id.clone(),
            rating: parse_leading_int(&row.rating)
                .map(|r| r.clamp(0, i64::from(MAX_RATING)) as u8)
                .unwrap_or(0),
            content: row.content.clone(),
            helpful_true_count: parse_leading_int(&row.helpful_true_count)
                .map(|n| n.max(0) as u64)
                .unwrap_or(0),
            attachments: parse_attachments(&row.attachments),
            created_at: row.created_at.clone(),
            display_name: non_empty_or(&row.display_name, ANONYMOUS_DISPLAY_NAME),
            vendor_name: non_empty_or(&row.vendor_name, UNKNOWN_VENDOR),
            reviewer_rank: row.reviewer_rank.clone(),
        }
    }
}

/// A review emitted for display, carrying its bucket's product fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayReview {
    pub product_id: String,
    pub item_name: String,
    #[serde(flatten)]
    pub review: ReviewRecord,
}

impl DisplayReview {
    pub fn is_top(&self) -> bool {
        self.review.is_top()
    }
}

// ── Field parsing ─────────────────────────────────────────────────────────────

/// Parse the leading integer of a field the way spreadsheet exports need:
/// surrounding whitespace is ignored and trailing garbage (`"4.0"`,
/// `"12 votes"`) is cut off.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits_end = trimmed[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| i + sign_len)
        .unwrap_or(trimmed.len());
    if digits_end == sign_len {
        return None;
    }
    trimmed[..digits_end].parse().ok()
}

/// Decode the JSON-encoded attachment list; malformed input yields no images.
pub fn parse_attachments(raw: &str) -> Vec<Attachment> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<Attachment>>(trimmed) {
        Ok(list) => list,
        Err(e) => {
            debug!("ignoring malformed attachments field: {}", e);
            Vec::new()
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RawReviewRow {
        RawReviewRow {
            review_id: "R1".to_string(),
            product_id: "P1".to_string(),
            item_name: "Kettle".to_string(),
            created_at: "2024-01-01 10:00".to_string(),
            rating: "4".to_string(),
            content: "Boils fast".to_string(),
            helpful_true_count: "3".to_string(),
            attachments: r#"[{"imgSrcOrigin":"https://img/1.jpg"}]"#.to_string(),
            display_name: "kim".to_string(),
            vendor_name: "ACME".to_string(),
            reviewer_rank: "".to_string(),
        }
    }

    #[test]
    fn test_is_top_rank_trims() {
        assert!(is_top_rank("GOLD"));
        assert!(!is_top_rank(""));
        assert!(!is_top_rank("   "));
    }

    #[test]
    fn test_dedup_id_blank_is_none() {
        let mut r = row();
        assert_eq!(r.dedup_id(), Some("R1"));
        r.review_id = "  ".to_string();
        assert_eq!(r.dedup_id(), None);
    }

    #[test]
    fn test_dedup_id_keeps_surrounding_whitespace() {
        let mut r = row();
        r.review_id = " R1 ".to_string();
        assert_eq!(r.dedup_id(), Some(" R1 "));
    }

    #[test]
    fn test_product_key_sentinel() {
        let mut r = row();
        assert_eq!(r.product_key(), "P1");
        r.product_id.clear();
        assert_eq!(r.product_key(), MISSING_PRODUCT_ID);
    }

    #[test]
    fn test_review_record_from_full_row() {
        let record = ReviewRecord::from(&row());
        assert_eq!(record.review_id, "R1");
        assert_eq!(record.rating, 4);
        assert_eq!(record.helpful_true_count, 3);
        assert_eq!(record.attachments.len(), 1);
        assert_eq!(record.attachments[0].img_src_origin, "https://img/1.jpg");
        assert_eq!(record.display_name, "kim");
        assert_eq!(record.vendor_name, "ACME");
        assert!(!record.is_top());
    }

    #[test]
    fn test_review_record_defaults() {
        let raw = RawReviewRow {
            review_id: "R2".to_string(),
            ..Default::default()
        };
        let record = ReviewRecord::from(&raw);
        assert_eq!(record.rating, 0);
        assert_eq!(record.helpful_true_count, 0);
        assert!(record.attachments.is_empty());
        assert_eq!(record.display_name, ANONYMOUS_DISPLAY_NAME);
        assert_eq!(record.vendor_name, UNKNOWN_VENDOR);
        assert_eq!(record.reviewer_rank, "");
    }

    #[test]
    fn test_rating_is_clamped() {
        let mut raw = row();
        raw.rating = "9".to_string();
        assert_eq!(ReviewRecord::from(&raw).rating, MAX_RATING);
        raw.rating = "-2".to_string();
        assert_eq!(ReviewRecord::from(&raw).rating, 0);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("5"), Some(5));
        assert_eq!(parse_leading_int(" 4.0 "), Some(4));
        assert_eq!(parse_leading_int("12 votes"), Some(12));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn test_parse_attachments_malformed() {
        assert!(parse_attachments("not json").is_empty());
        assert!(parse_attachments("[]").is_empty());
        assert!(parse_attachments("").is_empty());
        let two = parse_attachments(r#"[{"imgSrcOrigin":"a"},{"imgSrcOrigin":"b","w":1}]"#);
        assert_eq!(two.len(), 2);
    }

    #[test]
    fn test_raw_row_deserialises_camel_case_with_missing_columns() {
        let data = "reviewId,createdAt,reviewerRank\nA,2024-01-01 10:00,GOLD\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<RawReviewRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].review_id, "A");
        assert_eq!(rows[0].product_id, "");
        assert!(rows[0].is_top());
    }

    #[test]
    fn test_display_review_serialises_flat() {
        let display = DisplayReview {
            product_id: "P1".to_string(),
            item_name: "Kettle".to_string(),
            review: ReviewRecord::from(&row()),
        };
        let json = serde_json::to_value(&display).unwrap();
        assert_eq!(json["productId"], "P1");
        assert_eq!(json["reviewId"], "R1");
        assert_eq!(json["helpfulTrueCount"], 3);
    }
}
