//! Configuration for the pipeline pieces

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration, one section per piece
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PiecesConfig {
    /// Fetch piece configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Forecast piece configuration
    #[serde(default)]
    pub forecast: ForecastConfig,
}

impl PiecesConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::config(e.to_string()))
    }
}

/// How headers of multiple tabular inputs are reconciled
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAlignment {
    /// Every header must equal the first one
    Strict,
    /// Outer union of columns by first appearance, gaps left empty
    #[default]
    Union,
}

/// Fetch (extraction) piece configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Marker paragraph that opens the data region of a document
    pub sentinel: String,
    /// Field delimiter for document lines and the written output
    pub delimiter: char,
    /// Header reconciliation for tabular inputs
    pub column_alignment: ColumnAlignment,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sentinel: "#Data:".to_string(),
            delimiter: ',',
            column_alignment: ColumnAlignment::Union,
        }
    }
}

impl ExtractionConfig {
    /// Delimiter as a single byte, as the csv crate expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            return Err(Error::config(format!(
                "delimiter '{}' is not ASCII",
                self.delimiter
            )));
        }
        Ok(self.delimiter as u8)
    }
}

/// Forecast piece configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Predictor columns, in the order the model expects them
    pub feature_columns: Vec<String>,
    /// Observed PV output column
    pub observed_column: String,
    /// Timestamp column copied into the forecast
    pub timestamp_column: String,
    /// Name of the predicted output column
    pub prediction_column: String,
    /// Directory receiving the forecast artifacts
    pub results_dir: PathBuf,
    /// Forecast CSV file name inside `results_dir`
    pub forecast_file: String,
    /// Plot image file name inside `results_dir`
    pub plot_file: String,
    /// Plot rendering
    pub plot: PlotConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            feature_columns: [
                "GHI",
                "DIF",
                "TEMP",
                "diffuse_fraction",
                "solar_elevation_sin",
                "hour_of_day",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            observed_column: "PVOUT".to_string(),
            timestamp_column: "datetime".to_string(),
            prediction_column: "PVOUT_kW".to_string(),
            results_dir: PathBuf::from("results"),
            forecast_file: "solar_forecast.csv".to_string(),
            plot_file: "comparison.png".to_string(),
            plot: PlotConfig::default(),
        }
    }
}

impl ForecastConfig {
    /// Full path of the forecast CSV
    pub fn forecast_path(&self) -> PathBuf {
        self.results_dir.join(&self.forecast_file)
    }

    /// Full path of the comparison plot
    pub fn plot_path(&self) -> PathBuf {
        self.results_dir.join(&self.plot_file)
    }
}

/// Comparison plot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Legend entry for the observed series
    pub observed_label: String,
    /// Legend entry for the predicted series
    pub predicted_label: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1800,  // 12in at 150dpi
            height: 750,  // 5in at 150dpi
            title: "XGBoost vs Solargis Forecast".to_string(),
            x_label: "Time index (15-min steps)".to_string(),
            y_label: "Power (kW)".to_string(),
            observed_label: "Solargis PVOUT".to_string(),
            predicted_label: "XGBoost prediction".to_string(),
        }
    }
}
