//! Writing extracted rows as a headerless CSV

use std::path::Path;

use crate::error::Result;

/// Rows produced by one of the extractors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedRows {
    /// Raw delimited text lines from a document data section
    Lines(Vec<String>),
    /// Field vectors from tabular inputs
    Records(Vec<Vec<String>>),
}

impl ExtractedRows {
    pub fn len(&self) -> usize {
        match self {
            Self::Lines(lines) => lines.len(),
            Self::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split document lines into fields (CSV quoting rules apply) and pad
    /// every row to the widest one
    pub fn into_table(self, delimiter: u8) -> Result<Vec<Vec<String>>> {
        let mut rows = match self {
            Self::Records(records) => records,
            Self::Lines(lines) => {
                let mut rows = Vec::with_capacity(lines.len());
                for line in &lines {
                    rows.extend(split_line(line, delimiter)?);
                }
                rows
            }
        };

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Ok(rows)
    }
}

/// Split one text line into records. A line holding an embedded line break
/// yields more than one record.
fn split_line(line: &str, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(String::from).collect());
    }
    Ok(records)
}

/// Write rows without header or index, replacing any existing file.
/// Returns the number of rows written.
pub fn write_rows(path: &Path, rows: &[Vec<String>], delimiter: u8) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> ExtractedRows {
        ExtractedRows::Lines(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_lines_are_split_into_fields() {
        let rows = lines(&["1,2,3", "4,5,6"]).into_table(b',').unwrap();
        assert_eq!(rows, vec![vec!["1", "2", "3"], vec!["4", "5", "6"]]);
    }

    #[test]
    fn test_ragged_lines_are_padded() {
        let rows = lines(&["Date,GHI,DIF", "2024-01-01,5"]).into_table(b',').unwrap();
        assert_eq!(rows[1], vec!["2024-01-01", "5", ""]);
    }

    #[test]
    fn test_quoted_line() {
        let rows = lines(&["\"a,b\",c"]).into_table(b',').unwrap();
        assert_eq!(rows, vec![vec!["a,b", "c"]]);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let rows = lines(&["1;2"]).into_table(b';').unwrap();
        assert_eq!(rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_len() {
        assert!(lines(&[]).is_empty());
        assert_eq!(ExtractedRows::Records(vec![vec!["x".into()]]).len(), 1);
    }

    #[test]
    fn test_write_rows_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("data.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale content\nmore\nlines\n").unwrap();

        let rows = vec![
            vec!["1".to_string(), "a b".to_string()],
            vec!["2".to_string(), "c,d".to_string()],
        ];
        let written = write_rows(&path, &rows, b',').unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "1,a b\n2,\"c,d\"\n"
        );
    }

    #[test]
    fn test_write_rows_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("data.csv");
        write_rows(&path, &[vec!["x".to_string()]], b',').unwrap();
        assert!(path.exists());
    }
}
