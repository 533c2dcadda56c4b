//! Command-line runner for the solar pipeline pieces
//!
//! Run with: cargo run -p solar-pieces -- fetch --input-path 'data/*.docx' --input-filetype docx --output-path out/data.csv

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solar_pieces::{
    FetchInput, FetchPiece, ForecastInput, ForecastPiece, PieceRun, PiecesConfig, TracingLog,
};

#[derive(Parser)]
#[command(name = "solar-pieces")]
#[command(version, about = "Solar irradiance extraction and PV forecasting", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract Solargis data from DOCX or CSV files into one CSV
    Fetch {
        /// File, directory, or glob pattern
        #[arg(long)]
        input_path: String,

        /// Input file type (docx, csv)
        #[arg(long)]
        input_filetype: String,

        /// Destination CSV file
        #[arg(long)]
        output_path: String,
    },

    /// Forecast PV output with a trained model
    Forecast {
        /// Model JSON document
        #[arg(long)]
        model_path: String,

        /// Feature table CSV
        #[arg(long)]
        features_csv: String,

        /// Directory receiving the forecast and the plot
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },
}

fn print_run<O: Serialize>(run: &PieceRun<O>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(run).context("Failed to serialize piece output")?;
    println!("{}", json);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "solar_pieces=debug"
    } else {
        "solar_pieces=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => PiecesConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => PiecesConfig::default(),
    };

    match cli.command {
        Commands::Fetch {
            input_path,
            input_filetype,
            output_path,
        } => {
            let input = FetchInput {
                input_path,
                input_filetype,
                output_path,
            };
            let run = FetchPiece::new(config.extraction)
                .run(&input, &TracingLog::new("fetch"))
                .with_context(|| format!("Fetch failed for {}", input.input_path))?;
            print_run(&run)?;
        }
        Commands::Forecast {
            model_path,
            features_csv,
            results_dir,
        } => {
            let mut forecast = config.forecast;
            if let Some(dir) = results_dir {
                forecast.results_dir = dir;
            }
            let input = ForecastInput {
                model_path,
                features_csv,
            };
            let run = ForecastPiece::new(forecast)
                .run(&input, &TracingLog::new("forecast"))
                .with_context(|| format!("Forecast failed for {}", input.features_csv))?;
            print_run(&run)?;
        }
    }

    Ok(())
}
