//! Pipeline pieces: the units a workflow runner invokes

pub mod fetch;
pub mod forecast;

pub use fetch::FetchPiece;
pub use forecast::ForecastPiece;
