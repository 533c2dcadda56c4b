//! Source file discovery, extraction and CSV output

pub mod document;
pub mod resolver;
pub mod table;
pub mod writer;

pub use document::{read_docx_files, DataRegionScanner, ScanState};
pub use resolver::resolve_paths;
pub use table::{read_csv_files, Table};
pub use writer::{write_rows, ExtractedRows};
