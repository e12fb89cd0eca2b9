use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a load or reject user input.
///
/// Per-row problems (bad timestamps, unparseable ratings, malformed
/// attachment JSON) are recovered where they occur and never show up here.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Opening or reading an export failed.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ragged rows or invalid UTF-8 in an export.
    #[error("Failed to parse CSV {name}: {source}")]
    CsvParse {
        name: String,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Input path not found: {0}")]
    InputNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Background task failures and other foreign errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_read_names_the_path() {
        let err = ReviewError::FileRead {
            path: PathBuf::from("/exports/20240101_reviews.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read file /exports/20240101_reviews.csv: gone"
        );
    }

    #[test]
    fn test_csv_parse_keeps_source() {
        let mut reader = csv::Reader::from_reader("reviewId,productId\nA,P1,extra\n".as_bytes());
        let source = reader
            .records()
            .find_map(|r| r.err())
            .expect("unequal field count must error");
        let err = ReviewError::CsvParse {
            name: "20240101_reviews.csv".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Failed to parse CSV 20240101_reviews.csv"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_user_input_messages() {
        assert_eq!(
            ReviewError::InvalidDate("2024-13-01".to_string()).to_string(),
            "Invalid date: 2024-13-01"
        );
        assert_eq!(
            ReviewError::InputNotFound(PathBuf::from("/missing/dir")).to_string(),
            "Input path not found: /missing/dir"
        );
    }

    #[test]
    fn test_conversions_are_transparent() {
        let io: ReviewError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(io.to_string(), "denied");

        let other: ReviewError = anyhow::anyhow!("task panicked").into();
        assert_eq!(other.to_string(), "task panicked");
    }
}
