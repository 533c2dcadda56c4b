//! Piece inputs, outputs and display hints

use serde::{Deserialize, Serialize};

/// Input of the fetch piece
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchInput {
    /// Literal file, directory, or glob pattern
    pub input_path: String,
    /// File type tag (`docx` or `csv`)
    pub input_filetype: String,
    /// Destination CSV file
    pub output_path: String,
}

/// Output of the fetch piece
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchOutput {
    /// Human readable status
    pub message: String,
    /// Written file, empty when nothing was written
    pub file_path: String,
}

/// Input of the forecast piece
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastInput {
    /// Serialized model document
    pub model_path: String,
    /// Feature table
    pub features_csv: String,
}

/// Output of the forecast piece
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForecastOutput {
    pub message: String,
    pub forecast_file: String,
    pub plot_file: String,
}

/// Artifact hint for an external presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayResult {
    /// Artifact type tag, e.g. `csv` or `png`
    pub file_type: String,
    pub file_path: String,
}

impl DisplayResult {
    pub fn new(file_type: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
            file_path: file_path.into(),
        }
    }
}

/// Result of one piece run: its output plus the display hint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PieceRun<O> {
    pub output: O,
    pub display_result: DisplayResult,
}
