//! PV output forecasting: model scoring, forecast table and comparison plot

pub mod features;
pub mod model;
pub mod plot;

pub use features::{write_forecast_csv, FeatureFrame, ForecastRecord};
pub use model::{load_model, LinearModel, Regressor, TreeEnsemble};
pub use plot::render_comparison;
