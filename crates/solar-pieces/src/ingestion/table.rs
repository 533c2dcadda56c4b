//! CSV table reading and concatenation

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::ColumnAlignment;
use crate::error::{Error, Result};
use crate::log::PieceLog;

/// A header-driven table with untyped cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a CSV file whose first record is the header
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let columns = reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Read every CSV file and stack the rows, in file order.
///
/// Missing files are skipped with a warning. The returned rows exclude the
/// header.
pub fn read_csv_files(
    paths: &[PathBuf],
    alignment: ColumnAlignment,
    log: &dyn PieceLog,
) -> Result<Vec<Vec<String>>> {
    let mut tables = Vec::new();

    for path in paths {
        if !path.exists() {
            log.warn(&format!("File not found: {}", path.display()));
            continue;
        }

        log.info(&format!("Processing CSV file: {}", path.display()));
        let table = Table::from_csv_path(path)?;
        if table.columns.is_empty() {
            log.warn(&format!("File has no header, skipping: {}", path.display()));
            continue;
        }
        log.debug(&format!(
            "{}: {} columns, {} rows",
            path.display(),
            table.columns.len(),
            table.len()
        ));
        tables.push((path.clone(), table));
    }

    let combined = concat_tables(tables, alignment)?;
    Ok(combined.rows)
}

/// Stack tables row-wise according to `alignment`
pub fn concat_tables(
    tables: Vec<(PathBuf, Table)>,
    alignment: ColumnAlignment,
) -> Result<Table> {
    match alignment {
        ColumnAlignment::Strict => concat_strict(tables),
        ColumnAlignment::Union => Ok(concat_union(tables)),
    }
}

fn concat_strict(tables: Vec<(PathBuf, Table)>) -> Result<Table> {
    let mut combined: Option<Table> = None;

    for (path, table) in tables {
        match combined.as_mut() {
            None => combined = Some(table),
            Some(acc) => {
                if acc.columns != table.columns {
                    return Err(Error::ColumnMismatch {
                        path,
                        expected: acc.columns.clone(),
                        found: table.columns,
                    });
                }
                acc.rows.extend(table.rows);
            }
        }
    }

    Ok(combined.unwrap_or_default())
}

/// Outer union of columns keyed by (name, occurrence), so repeated header
/// names stay distinct columns
fn concat_union(tables: Vec<(PathBuf, Table)>) -> Table {
    let mut columns: Vec<String> = Vec::new();
    let mut positions: HashMap<(String, usize), usize> = HashMap::new();

    let keyed: Vec<(Vec<(String, usize)>, Table)> = tables
        .into_iter()
        .map(|(_, table)| {
            let mut seen: HashMap<String, usize> = HashMap::new();
            let keys = table
                .columns
                .iter()
                .map(|name| {
                    let n = seen.entry(name.clone()).or_insert(0);
                    *n += 1;
                    (name.clone(), *n)
                })
                .collect();
            (keys, table)
        })
        .collect();

    for (keys, _) in &keyed {
        for key in keys {
            if !positions.contains_key(key) {
                positions.insert(key.clone(), columns.len());
                columns.push(key.0.clone());
            }
        }
    }

    let mut rows = Vec::new();
    for (keys, table) in keyed {
        let targets: Vec<usize> = keys.iter().map(|k| positions[k]).collect();
        for row in table.rows {
            let mut projected = vec![String::new(); columns.len()];
            for (value, &target) in row.into_iter().zip(&targets) {
                projected[target] = value;
            }
            rows.push(projected);
        }
    }

    Table { columns, rows }
}
