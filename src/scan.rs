//! Content directory scanning.
//!
//! Lists the content files of a project, one page per file. Files are
//! returned in directory-listing order and are *not* sorted: the order of
//! the tag groups on the index page follows from it.
//!
//! Only regular files directly inside the content directory are pages.
//! Subdirectories and dotfiles (`.DS_Store`, editor swap files) are skipped.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Content directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A content file found by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSource {
    /// File name inside the content directory.
    pub filename: String,
    pub path: PathBuf,
}

fn is_hidden(filename: &str) -> bool {
    filename.starts_with('.')
}

/// List the content files in `dir` in directory-listing order.
pub fn scan(dir: &Path) -> Result<Vec<ContentSource>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::MissingDirectory(dir.to_path_buf()));
    }
    let io_err = |source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut sources = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let filename = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&filename) || !entry.path().is_file() {
            continue;
        }
        sources.push(ContentSource {
            filename,
            path: entry.path(),
        });
    }

    tracing::debug!(dir = %dir.display(), count = sources.len(), "scanned content");
    Ok(sources)
}
