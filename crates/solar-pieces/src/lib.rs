//! solar-pieces: data preparation and forecasting steps of a solar PV pipeline
//!
//! Two pieces are provided:
//! - [`FetchPiece`] extracts Solargis irradiance data from DOCX reports or
//!   CSV exports and writes it as one headerless CSV file.
//! - [`ForecastPiece`] scores a feature table with a pre-trained model and
//!   writes a forecast CSV plus a comparison plot.
//!
//! Both report recoverable conditions through their output message and
//! return [`Error`] only for fatal failures.

pub mod config;
pub mod error;
pub mod forecast;
pub mod ingestion;
pub mod log;
pub mod pieces;
pub mod types;

pub use config::{ColumnAlignment, ExtractionConfig, ForecastConfig, PiecesConfig, PlotConfig};
pub use error::{Error, Result};
pub use log::{Level, MemoryLog, PieceLog, TracingLog};
pub use pieces::{FetchPiece, ForecastPiece};
pub use types::{
    file_type::InputFileType,
    piece::{DisplayResult, FetchInput, FetchOutput, ForecastInput, ForecastOutput, PieceRun},
};
