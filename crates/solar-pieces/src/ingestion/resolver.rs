//! Input path resolution: literal files, directories and glob patterns

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::log::PieceLog;
use crate::types::InputFileType;

/// Whether the path should be expanded as a glob pattern
pub fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?'])
}

/// Expand `input` into the ordered list of files to process.
///
/// Patterns and directories are filtered by the extension of `file_type`.
/// A literal path is returned as is, even when it does not exist; the
/// extractors skip missing files with a warning.
pub fn resolve_paths(
    input: &str,
    file_type: InputFileType,
    log: &dyn PieceLog,
) -> Result<Vec<PathBuf>> {
    if is_pattern(input) {
        return expand_pattern(input, file_type, log);
    }

    let path = Path::new(input);
    if path.is_dir() {
        return list_directory(path, file_type, log);
    }

    Ok(vec![path.to_path_buf()])
}

fn expand_pattern(
    pattern: &str,
    file_type: InputFileType,
    log: &dyn PieceLog,
) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| Error::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() && file_type.matches(&path) {
                    files.push(path);
                }
            }
            Err(e) => log.warn(&format!("Error reading path: {}", e)),
        }
    }

    log.debug(&format!(
        "Pattern '{}' matched {} {} file(s)",
        pattern,
        files.len(),
        file_type
    ));
    Ok(files)
}

fn list_directory(
    dir: &Path,
    file_type: InputFileType,
    log: &dyn PieceLog,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && file_type.matches(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => log.warn(&format!("Error reading directory entry: {}", e)),
        }
    }

    log.debug(&format!(
        "Directory '{}' holds {} {} file(s)",
        dir.display(),
        files.len(),
        file_type
    ));
    Ok(files)
}
