//! Supported input file types

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input formats the fetch piece can extract from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InputFileType {
    /// Word document with a `#Data:` section (.docx)
    Docx,
    /// Comma separated table with a header row (.csv)
    Csv,
}

impl InputFileType {
    /// Parse a user supplied file type tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Csv => "csv",
        }
    }

    /// Whether `path` carries this type's extension (case-insensitive)
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(self.extension()))
            .unwrap_or(false)
    }
}

impl std::fmt::Display for InputFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(InputFileType::from_tag("docx"), Some(InputFileType::Docx));
        assert_eq!(InputFileType::from_tag("DOCX"), Some(InputFileType::Docx));
        assert_eq!(InputFileType::from_tag(" Csv "), Some(InputFileType::Csv));
        assert_eq!(InputFileType::from_tag("xml"), None);
        assert_eq!(InputFileType::from_tag(""), None);
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let csv = InputFileType::Csv;
        assert!(csv.matches(Path::new("data/a.csv")));
        assert!(csv.matches(Path::new("data/B.CSV")));
        assert!(!csv.matches(Path::new("data/a.docx")));
        assert!(!csv.matches(Path::new("data/a.csv.bak")));
        assert!(!csv.matches(Path::new("data/csv")));

        let docx = InputFileType::Docx;
        assert!(docx.matches(Path::new("report.DocX")));
        assert!(!docx.matches(Path::new("report.doc")));
    }
}
