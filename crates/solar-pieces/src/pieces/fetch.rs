//! Fetch piece: DOCX/CSV irradiance data to a normalized CSV

use std::path::Path;

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::ingestion::{read_csv_files, read_docx_files, resolve_paths, write_rows, ExtractedRows};
use crate::log::PieceLog;
use crate::types::{DisplayResult, FetchInput, FetchOutput, InputFileType, PieceRun};

/// Extracts Solargis data from documents or tables into one CSV file
#[derive(Debug, Clone, Default)]
pub struct FetchPiece {
    config: ExtractionConfig,
}

impl FetchPiece {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run one extraction.
    ///
    /// Unsupported file types, inputs that resolve to nothing and inputs
    /// without data are reported in the output with an empty `file_path`.
    /// Parse and write failures are returned as errors.
    pub fn run(&self, input: &FetchInput, log: &dyn PieceLog) -> Result<PieceRun<FetchOutput>> {
        log.info(&format!(
            "Fetching data from {} → {}",
            input.input_path, input.output_path
        ));
        log.info(&format!("File type: {}", input.input_filetype));

        let type_label = input.input_filetype.to_uppercase();

        let Some(file_type) = InputFileType::from_tag(&input.input_filetype) else {
            let message = format!("Unsupported file type: {}", input.input_filetype);
            log.error(&message);
            return Ok(Self::finish(message, String::new()));
        };
        let delimiter = self.config.delimiter_byte()?;

        let files = resolve_paths(&input.input_path, file_type, log)?;
        if files.is_empty() {
            let message = format!("No {} files found at: {}", type_label, input.input_path);
            log.warn(&message);
            return Ok(Self::finish(message, String::new()));
        }

        let rows = match file_type {
            InputFileType::Docx => {
                ExtractedRows::Lines(read_docx_files(&files, &self.config.sentinel, log)?)
            }
            InputFileType::Csv => ExtractedRows::Records(read_csv_files(
                &files,
                self.config.column_alignment,
                log,
            )?),
        };

        if rows.is_empty() {
            let message = format!("No data found in {} files.", type_label);
            log.warn(&message);
            return Ok(Self::finish(message, String::new()));
        }

        // One extracted row per data paragraph or CSV record, however many
        // output lines it spans
        let found = rows.len();
        let table = rows.into_table(delimiter)?;
        write_rows(Path::new(&input.output_path), &table, delimiter)?;

        let message = format!("Files processed successfully, {} rows found.", found);
        log.info(&message);
        Ok(Self::finish(message, input.output_path.clone()))
    }

    fn finish(message: String, file_path: String) -> PieceRun<FetchOutput> {
        PieceRun {
            display_result: DisplayResult::new("csv", file_path.clone()),
            output: FetchOutput { message, file_path },
        }
    }
}
