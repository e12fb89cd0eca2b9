//! Cross-file review deduplication.

use std::collections::HashSet;

use review_core::models::RawReviewRow;

/// Admits each distinct, non-empty review id exactly once.
///
/// Rows must be fed in ascending file-date order; the first copy of an id
/// wins and later copies are dropped.
#[derive(Debug, Default)]
pub struct ReviewDeduplicator {
    seen: HashSet<String>,
    missing_id: u64,
    duplicates: u64,
}

impl ReviewDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `row` should be passed to the aggregator.
    pub fn admit(&mut self, row: &RawReviewRow) -> bool {
        let Some(id) = row.dedup_id() else {
            self.missing_id += 1;
            return false;
        };
        if self.seen.insert(id.to_string()) {
            true
        } else {
            self.duplicates += 1;
            false
        }
    }

    /// Consume a file's rows and keep only those admitted.
    pub fn retain_new(&mut self, rows: Vec<RawReviewRow>) -> Vec<RawReviewRow> {
        rows.into_iter().filter(|row| self.admit(row)).collect()
    }

    /// Number of distinct ids admitted so far.
    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }

    /// Rows skipped because they had no review id.
    pub fn missing_id_count(&self) -> u64 {
        self.missing_id
    }

    /// Rows skipped because their id was already admitted.
    pub fn duplicate_count(&self) -> u64 {
        self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, content: &str) -> RawReviewRow {
        RawReviewRow {
            review_id: id.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut dedup = ReviewDeduplicator::new();
        let first = dedup.retain_new(vec![row("A", "old")]);
        let second = dedup.retain_new(vec![row("A", "new"), row("B", "b")]);

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].content, "old");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].review_id, "B");
        assert_eq!(dedup.unique_count(), 2);
        assert_eq!(dedup.duplicate_count(), 1);
    }

    #[test]
    fn test_duplicates_within_one_file() {
        let mut dedup = ReviewDeduplicator::new();
        let kept = dedup.retain_new(vec![row("A", "1"), row("A", "2")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].content, "1");
    }

    #[test]
    fn test_missing_ids_are_skipped_not_collapsed() {
        let mut dedup = ReviewDeduplicator::new();
        let kept = dedup.retain_new(vec![row("", "x"), row("  ", "y"), row("C", "z")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(dedup.missing_id_count(), 2);
        assert_eq!(dedup.duplicate_count(), 0);
    }

    #[test]
    fn test_padded_id_is_a_distinct_review() {
        let mut dedup = ReviewDeduplicator::new();
        let kept = dedup.retain_new(vec![row("A", "plain"), row(" A", "padded")]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].review_id, " A");
        assert_eq!(dedup.unique_count(), 2);
        assert_eq!(dedup.duplicate_count(), 0);
    }

    #[test]
    fn test_unique_ids_across_files_all_kept() {
        let mut dedup = ReviewDeduplicator::new();
        let files = vec![
            vec![row("A", ""), row("B", "")],
            vec![row("C", "")],
            vec![row("D", ""), row("E", ""), row("F", "")],
        ];
        let expected: usize = files.iter().map(Vec::len).sum();
        let kept: usize = files
            .into_iter()
            .map(|rows| dedup.retain_new(rows).len())
            .sum();
        assert_eq!(kept, expected);
    }
}
