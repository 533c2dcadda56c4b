//! Feature table loading and forecast output

use ndarray::Array2;
use std::path::Path;

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::ingestion::Table;

/// Feature table reduced to the columns the forecast needs
#[derive(Debug, Clone)]
pub struct FeatureFrame {
    /// Timestamp cells, verbatim
    pub timestamps: Vec<String>,
    /// Observed output cells, verbatim
    pub observed_raw: Vec<String>,
    /// Observed output, `NaN` where the cell is empty
    pub observed: Vec<f64>,
    /// Row-major feature matrix in configured column order
    pub features: Array2<f64>,
}

impl FeatureFrame {
    /// Read `path` and select the configured columns by name
    pub fn from_csv(path: &Path, config: &ForecastConfig) -> Result<Self> {
        let table = Table::from_csv_path(path)?;
        Self::from_table(&table, config)
    }

    pub fn from_table(table: &Table, config: &ForecastConfig) -> Result<Self> {
        let index = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| Error::missing_column(name))
        };

        let feature_idx = config
            .feature_columns
            .iter()
            .map(|name| index(name.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let observed_idx = index(&config.observed_column)?;
        let timestamp_idx = index(&config.timestamp_column)?;

        let n_rows = table.len();
        let n_features = feature_idx.len();
        let mut values = Vec::with_capacity(n_rows * n_features);
        let mut observed = Vec::with_capacity(n_rows);

        for (i, row) in table.rows.iter().enumerate() {
            for (&col, name) in feature_idx.iter().zip(&config.feature_columns) {
                values.push(parse_cell(&row[col], name, i + 1)?);
            }
            observed.push(parse_cell(&row[observed_idx], &config.observed_column, i + 1)?);
        }

        let features = Array2::from_shape_vec((n_rows, n_features), values)
            .map_err(|e| Error::FeatureMismatch(e.to_string()))?;

        Ok(Self {
            timestamps: table.rows.iter().map(|r| r[timestamp_idx].clone()).collect(),
            observed_raw: table.rows.iter().map(|r| r[observed_idx].clone()).collect(),
            observed,
            features,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Pair each input row with its prediction, in input order
    pub fn records(&self, predictions: &[f64]) -> Vec<ForecastRecord> {
        self.timestamps
            .iter()
            .zip(&self.observed_raw)
            .zip(predictions)
            .map(|((timestamp, observed), &predicted)| ForecastRecord {
                timestamp: timestamp.clone(),
                observed: observed.clone(),
                predicted,
            })
            .collect()
    }
}

/// Empty cells are missing values
fn parse_cell(raw: &str, column: &str, row: usize) -> Result<f64> {
    let cell = raw.trim();
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| Error::InvalidValue {
        column: column.to_string(),
        row,
        value: raw.to_string(),
    })
}

/// One forecast time step
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRecord {
    pub timestamp: String,
    /// Observed value as it appeared in the input
    pub observed: String,
    pub predicted: f64,
}

fn format_prediction(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Write the forecast table with a header row
pub fn write_forecast_csv(
    path: &Path,
    records: &[ForecastRecord],
    config: &ForecastConfig,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        config.timestamp_column.as_str(),
        config.observed_column.as_str(),
        config.prediction_column.as_str(),
    ])?;

    for record in records {
        writer.write_record([
            record.timestamp.as_str(),
            record.observed.as_str(),
            format_prediction(record.predicted).as_str(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}
