//! New page creation.
//!
//! Writes a fresh content file holding only the header block, ready for the
//! author to fill in:
//!
//! ```text
//! Title: My First Post
//! Tag: tech
//! ===============
//! ```
//!
//! An existing file is never overwritten unless the caller forces it.

use crate::config::SiteConfig;
use crate::content;
use crate::write::{WriteError, write_output};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreateError {
    #[error("Content file already exists: {0} (pass --force to overwrite)")]
    FileExists(PathBuf),
    #[error("Invalid content filename `{0}`: must be a plain, non-hidden file name")]
    InvalidFilename(String),
    #[error("Page {0} must be a single line")]
    MultilineValue(&'static str),
    #[error("Page tag must not be empty")]
    EmptyTag,
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

/// What to create.
#[derive(Debug, Clone)]
pub struct NewPage<'a> {
    pub title: &'a str,
    pub tag: &'a str,
    pub filename: &'a str,
    /// Overwrite an existing file.
    pub force: bool,
}

fn check_filename(filename: &str) -> Result<(), CreateError> {
    let plain = !filename.is_empty()
        && !filename.starts_with('.')
        && !filename.contains(['/', '\\'])
        && !filename.contains(char::is_control);
    if plain {
        Ok(())
    } else {
        Err(CreateError::InvalidFilename(filename.to_string()))
    }
}

fn check_single_line(field: &'static str, value: &str) -> Result<(), CreateError> {
    if value.contains(['\n', '\r']) {
        Err(CreateError::MultilineValue(field))
    } else {
        Ok(())
    }
}

/// Create a content file under the project's content directory and return
/// its path.
pub fn create_page(
    config: &SiteConfig,
    project_root: &Path,
    page: &NewPage,
) -> Result<PathBuf, CreateError> {
    check_filename(page.filename)?;
    check_single_line("title", page.title)?;
    check_single_line("tag", page.tag)?;
    if page.tag.trim().is_empty() {
        return Err(CreateError::EmptyTag);
    }

    let path = config.paths(project_root).content.join(page.filename);
    if path.exists() && !page.force {
        return Err(CreateError::FileExists(path));
    }

    write_output(&path, &content::header(page.title, page.tag))?;
    tracing::info!(path = %path.display(), tag = page.tag, "created page");
    Ok(path)
}
