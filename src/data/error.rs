use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source file into a [`RecordStore`](super::RecordStore).
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed Arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{0}")]
    Malformed(String),
}

/// A year range whose lower bound exceeds its upper bound.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid year range: lower bound {lower} exceeds upper bound {upper}")]
pub struct InvalidRangeError {
    pub lower: i32,
    pub upper: i32,
}
