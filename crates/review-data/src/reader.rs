//! CSV export discovery and parsing.
//!
//! Input files are reached through the [`ReviewSource`] trait so the
//! pipeline can run over files on disk or in-memory buffers alike.

use std::io::Read;
use std::path::{Path, PathBuf};

use review_core::error::{Result, ReviewError};
use review_core::models::RawReviewRow;
use tracing::{debug, warn};

// ── Sources ───────────────────────────────────────────────────────────────────

/// A named byte source holding one CSV export.
pub trait ReviewSource {
    /// File name used to derive the snapshot date.
    fn name(&self) -> &str;

    /// Open the source for reading.
    fn open(&self) -> Result<Box<dyn Read + '_>>;
}

/// A CSV export on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReviewSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        let file = std::fs::File::open(&self.path).map_err(|source| ReviewError::FileRead {
            path: self.path.clone(),
            source,
        })?;
        Ok(Box::new(std::io::BufReader::new(file)))
    }
}

/// A CSV export already held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl ReviewSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(self.bytes.as_slice()))
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse every record of a CSV export into [`RawReviewRow`]s.
///
/// The first line is the header; blank lines are skipped. Any structural
/// error (ragged rows, invalid UTF-8) is returned as
/// [`ReviewError::CsvParse`] and the caller must abandon the load.
pub fn parse_reviews<R: Read>(name: &str, reader: R) -> Result<Vec<RawReviewRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<RawReviewRow>() {
        let row = record.map_err(|source| ReviewError::CsvParse {
            name: name.to_string(),
            source,
        })?;
        rows.push(row);
    }

    debug!("{}: parsed {} rows", name, rows.len());
    Ok(rows)
}

/// Open and parse one source.
pub fn read_source<S: ReviewSource + ?Sized>(source: &S) -> Result<Vec<RawReviewRow>> {
    let reader = source.open()?;
    parse_reviews(source.name(), reader)
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Expand command-line inputs into CSV file sources.
///
/// Files are taken as given; directories are walked recursively for `*.csv`
/// files, sorted by path. A path that does not exist is an error.
pub fn discover_sources(inputs: &[PathBuf]) -> Result<Vec<FileSource>> {
    let mut sources = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_csv_files(input);
            if found.is_empty() {
                warn!("No CSV files found in {}", input.display());
            }
            sources.extend(found.into_iter().map(FileSource::new));
        } else if input.is_file() {
            sources.push(FileSource::new(input.clone()));
        } else {
            return Err(ReviewError::InputNotFound(input.clone()));
        }
    }
    Ok(sources)
}

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "reviewId,productId,itemName,createdAt,rating,content,helpfulTrueCount,attachments,displayName,vendorName,reviewerRank";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    // ── parse_reviews ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_reviews_full_schema() {
        let data = format!(
            "{}\nA,P1,Kettle,2024-01-01 10:00,5,\"Great, really\",2,\"[{{\"\"imgSrcOrigin\"\":\"\"x\"\"}}]\",kim,ACME,GOLD\n",
            HEADER
        );
        let rows = parse_reviews("20240101.csv", data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].review_id, "A");
        assert_eq!(rows[0].content, "Great, really");
        assert_eq!(rows[0].attachments, r#"[{"imgSrcOrigin":"x"}]"#);
        assert_eq!(rows[0].reviewer_rank, "GOLD");
    }

    #[test]
    fn test_parse_reviews_skips_blank_lines() {
        let data = "reviewId,productId\nA,P1\n\nB,P2\n\n";
        let rows = parse_reviews("x.csv", data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].review_id, "B");
    }

    #[test]
    fn test_parse_reviews_header_only() {
        let rows = parse_reviews("x.csv", HEADER.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_reviews_ragged_row_is_fatal() {
        let data = "reviewId,productId\nA,P1\nB,P2,extra\n";
        let err = parse_reviews("20240101_bad.csv", data.as_bytes()).unwrap_err();
        match err {
            ReviewError::CsvParse { name, .. } => assert_eq!(name, "20240101_bad.csv"),
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── Sources ───────────────────────────────────────────────────────────────

    #[test]
    fn test_memory_source_round_trip() {
        let source = MemorySource::new("20240101.csv", "reviewId\nA\n");
        assert_eq!(source.name(), "20240101.csv");
        let rows = read_source(&source).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_file_source_name_and_read() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "20240103_reviews.csv", &["reviewId", "A", "B"]);
        let source = FileSource::new(&path);
        assert_eq!(source.name(), "20240103_reviews.csv");
        assert_eq!(source.path(), path.as_path());
        assert_eq!(read_source(&source).unwrap().len(), 2);
    }

    #[test]
    fn test_file_source_missing_file_errors() {
        let source = FileSource::new("/tmp/does-not-exist-review-monitor/20240101.csv");
        assert!(matches!(
            read_source(&source),
            Err(ReviewError::FileRead { .. })
        ));
    }

    // ── Discovery ─────────────────────────────────────────────────────────────

    #[test]
    fn test_find_csv_files_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("january");
        std::fs::create_dir_all(&sub).unwrap();
        write_csv(dir.path(), "b_20240102.csv", &["reviewId"]);
        write_csv(dir.path(), "a_20240101.CSV", &["reviewId"]);
        write_csv(&sub, "c_20240103.csv", &["reviewId"]);
        write_csv(dir.path(), "notes.txt", &["ignore me"]);

        let files = find_csv_files(dir.path());
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a_20240101.CSV", "b_20240102.csv", "c_20240103.csv"]);
    }

    #[test]
    fn test_discover_sources_mixes_files_and_dirs() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("exports");
        std::fs::create_dir_all(&sub).unwrap();
        write_csv(&sub, "20240101.csv", &["reviewId"]);
        write_csv(&sub, "20240102.csv", &["reviewId"]);
        let single = write_csv(dir.path(), "20240103.csv", &["reviewId"]);

        let sources = discover_sources(&[sub, single]).unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[2].name(), "20240103.csv");
    }

    #[test]
    fn test_discover_sources_missing_path_errors() {
        let err = discover_sources(&[PathBuf::from("/tmp/review-monitor-missing-xyz")])
            .unwrap_err();
        assert!(matches!(err, ReviewError::InputNotFound(_)));
    }
}
