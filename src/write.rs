//! Output writing and static asset copying.
//!
//! Every output file is written to a temporary file next to its destination
//! and then renamed over it, so a reader (or a failed run) never sees a
//! half-written page. Missing parent directories are created first.
//!
//! Runs are not transactional: if the third page fails to write, the first
//! two stay updated.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error reading {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `content` to `path`, replacing any existing file.
pub fn write_output(path: &Path, content: &str) -> Result<(), WriteError> {
    let err = io_error(path);
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(&err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(&err)?;
    tmp.write_all(content.as_bytes()).map_err(&err)?;
    tmp.flush().map_err(&err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(&err)?;
    }
    tmp.persist(path).map_err(|e| err(e.error))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote");
    Ok(())
}

/// Copy the static theme tree `src` into `dst`, returning the number of
/// files copied. A missing `src` copies nothing.
pub fn copy_assets(src: &Path, dst: &Path) -> Result<usize, WriteError> {
    if !src.is_dir() {
        tracing::warn!(path = %src.display(), "static directory not found, no assets copied");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| WriteError::Walk {
            path: src.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_error(&target))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(io_error(parent))?;
            }
            fs::copy(entry.path(), &target).map_err(io_error(&target))?;
            copied += 1;
        }
    }

    tracing::debug!(src = %src.display(), dst = %dst.display(), copied, "copied assets");
    Ok(copied)
}
