//! Error types for the pipeline pieces

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for piece operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal piece errors.
///
/// Recoverable outcomes (missing inputs, unsupported file types, empty
/// extractions) are reported through the piece output instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid glob pattern
    #[error("Invalid path pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Header of a tabular file does not line up with the first file
    #[error("Column mismatch in '{}': expected [{}], found [{}]", .path.display(), .expected.join(", "), .found.join(", "))]
    ColumnMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Model could not be read or is malformed
    #[error("Failed to load model '{path}': {message}")]
    ModelLoad { path: String, message: String },

    /// Required column missing from a feature table
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    /// Cell could not be interpreted as a number
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    /// Model and configured features disagree
    #[error("Feature mismatch: {0}")]
    FeatureMismatch(String),

    /// Plot rendering error
    #[error("Plot rendering failed: {0}")]
    Plot(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a model load error
    pub fn model_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a plot error
    pub fn plot(message: impl ToString) -> Self {
        Self::Plot(message.to_string())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
