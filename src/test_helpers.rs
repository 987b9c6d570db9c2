//! Shared test utilities for the arco test suite.
//!
//! Provides fixture setup and lookup helpers for tests that run the whole
//! pipeline against a real project directory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = load_fixture_config(tmp.path());
//! let report = generate(&config, tmp.path()).unwrap();
//!
//! let tech = find_tag(&report, "tech");
//! assert_eq!(tech.pages.len(), 2);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::config::{SiteConfig, load_config};
use crate::generate::{GenerateReport, TagReport};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the project config from a fixture copy. Panics on error.
pub fn load_fixture_config(root: &Path) -> SiteConfig {
    load_config(root).unwrap_or_else(|e| panic!("fixture config failed to load: {e}"))
}

// =========================================================================
// Report lookups (panic with a clear message on miss)
// =========================================================================

/// Find a tag group in a generate report. Panics if not found.
pub fn find_tag<'a>(report: &'a GenerateReport, tag: &str) -> &'a TagReport {
    report.tags.iter().find(|t| t.tag == tag).unwrap_or_else(|| {
        let tags: Vec<&str> = report.tags.iter().map(|t| t.tag.as_str()).collect();
        panic!("tag '{tag}' not found. Available: {tags:?}")
    })
}

// =========================================================================
// Output inspection
// =========================================================================

/// Every file under `dir`, keyed by path relative to `dir`.
pub fn read_tree(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (relative, std::fs::read(e.path()).unwrap())
        })
        .collect()
}
