//! Content files and their front matter.
//!
//! Every content file starts with a fixed three-line header:
//!
//! ```text
//! Title: Hello, world
//! Tag: rust
//! ===============
//! The body starts here and is passed to the markdown converter verbatim.
//! ```
//!
//! The third line is a visual separator and its content is ignored. The body
//! keeps its original line endings and is not trimmed.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TITLE_LABEL: &str = "Title";
pub const TAG_LABEL: &str = "Tag";
pub const LABEL_SEPARATOR: char = ':';
/// Separator line written by [`header`]. Parsing accepts any third line.
pub const HEADER_RULE: &str = "===============";

/// A parsed content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    /// File name inside the content directory, extension included.
    pub filename: String,
    pub title: String,
    pub tag: String,
    /// Raw markdown after the header.
    pub body: String,
}

/// Why a header could not be parsed. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The file has fewer than the two metadata lines.
    TooFewLines(usize),
    /// The line does not start with the expected label.
    LabelMismatch { line: usize, expected: &'static str },
    /// The label is not followed by `:`.
    MissingSeparator { line: usize, label: &'static str },
    /// Nothing follows the label. Only the tag must be non-empty: it names
    /// the page's output directory.
    EmptyValue { line: usize, label: &'static str },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::TooFewLines(n) => {
                write!(f, "expected at least 2 header lines, found {n}")
            }
            MalformedReason::LabelMismatch { line, expected } => {
                write!(f, "line {line} must start with `{expected}{LABEL_SEPARATOR}`")
            }
            MalformedReason::MissingSeparator { line, label } => {
                write!(f, "line {line}: missing `{LABEL_SEPARATOR}` after `{label}`")
            }
            MalformedReason::EmptyValue { line, label } => {
                write!(f, "line {line}: `{label}` has no value")
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed content file {file}: {reason}")]
    MalformedContent {
        file: String,
        reason: MalformedReason,
    },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Extract the value of a `Label: value` header line.
fn header_value<'a>(
    line: &'a str,
    number: usize,
    label: &'static str,
) -> Result<&'a str, MalformedReason> {
    let rest = line
        .strip_prefix(label)
        .ok_or(MalformedReason::LabelMismatch {
            line: number,
            expected: label,
        })?;
    let value = rest
        .trim_start()
        .strip_prefix(LABEL_SEPARATOR)
        .ok_or(MalformedReason::MissingSeparator {
            line: number,
            label,
        })?;
    Ok(value.trim())
}

/// Parse the raw text of a content file.
///
/// `filename` is recorded on the result and used in error messages; no file
/// is read.
pub fn parse_content(filename: &str, text: &str) -> Result<ContentFile, ParseError> {
    let malformed = |reason| ParseError::MalformedContent {
        file: filename.to_string(),
        reason,
    };

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let header: Vec<&str> = text.split_inclusive('\n').take(3).collect();
    if header.len() < 2 {
        return Err(malformed(MalformedReason::TooFewLines(header.len())));
    }

    let title = header_value(header[0], 1, TITLE_LABEL).map_err(malformed)?;
    let tag = header_value(header[1], 2, TAG_LABEL).map_err(malformed)?;
    if tag.is_empty() {
        return Err(malformed(MalformedReason::EmptyValue {
            line: 2,
            label: TAG_LABEL,
        }));
    }
    let body_start: usize = header.iter().map(|line| line.len()).sum();

    Ok(ContentFile {
        filename: filename.to_string(),
        title: title.to_string(),
        tag: tag.to_string(),
        body: text[body_start..].to_string(),
    })
}

/// Read and parse a content file from disk.
pub fn load_content(path: &Path) -> Result<ContentFile, ParseError> {
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_content(&filename, &text)
}

/// The header block of a new, empty content file.
pub fn header(title: &str, tag: &str) -> String {
    format!(
        "{TITLE_LABEL}{LABEL_SEPARATOR} {title}\n{TAG_LABEL}{LABEL_SEPARATOR} {tag}\n{HEADER_RULE}\n"
    )
}
