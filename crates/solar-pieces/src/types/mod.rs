//! Core types shared by the pieces

pub mod file_type;
pub mod piece;

pub use file_type::InputFileType;
pub use piece::{
    DisplayResult, FetchInput, FetchOutput, ForecastInput, ForecastOutput, PieceRun,
};
