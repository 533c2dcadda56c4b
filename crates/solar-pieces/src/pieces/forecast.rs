//! Forecast piece: score a feature table with a trained model

use std::path::Path;

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::forecast::{load_model, render_comparison, write_forecast_csv, FeatureFrame};
use crate::log::PieceLog;
use crate::types::{DisplayResult, ForecastInput, ForecastOutput, PieceRun};

/// Produces a PV output forecast and a comparison plot
#[derive(Debug, Clone, Default)]
pub struct ForecastPiece {
    config: ForecastConfig,
}

impl ForecastPiece {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run one forecast. Nothing is written until the model and the feature
    /// table have both been validated.
    pub fn run(
        &self,
        input: &ForecastInput,
        log: &dyn PieceLog,
    ) -> Result<PieceRun<ForecastOutput>> {
        log.info(&format!("Loading model: {}", input.model_path));
        let model = load_model(Path::new(&input.model_path))?;

        log.info(&format!("Reading features: {}", input.features_csv));
        let frame = FeatureFrame::from_csv(Path::new(&input.features_csv), &self.config)?;
        model
            .expects_features(&self.config.feature_columns)
            .map_err(Error::FeatureMismatch)?;

        let predictions = model.predict(&frame.features);
        log.debug(&format!("Scored {} rows", predictions.len()));

        std::fs::create_dir_all(&self.config.results_dir)?;

        let forecast_path = self.config.forecast_path();
        write_forecast_csv(&forecast_path, &frame.records(&predictions), &self.config)?;
        log.info(&format!("Forecast written: {}", forecast_path.display()));

        let plot_path = self.config.plot_path();
        render_comparison(&plot_path, &frame.observed, &predictions, &self.config.plot)?;
        log.info(&format!("Plot written: {}", plot_path.display()));

        let plot_file = plot_path.to_string_lossy().to_string();
        Ok(PieceRun {
            display_result: DisplayResult::new("png", plot_file.clone()),
            output: ForecastOutput {
                message: "Forecast generated successfully".to_string(),
                forecast_file: forecast_path.to_string_lossy().to_string(),
                plot_file,
            },
        })
    }
}
