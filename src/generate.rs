//! Site generation.
//!
//! Runs the whole pipeline for one project:
//!
//! ```text
//! load templates → scan → parse all → build tag index
//!     → render pages → render index → write → copy assets
//! ```
//!
//! The run is fail-fast. Templates are loaded and checked before anything
//! else, and every page is rendered in memory before the first file is
//! written, so a bad header or template stops the run with the output tree
//! untouched.
//!
//! ## Output Structure
//!
//! ```text
//! output/
//! ├── index.html          # All pages, grouped by tag
//! ├── tech/
//! │   └── hello.html      # md/hello.md, tagged `tech`
//! ├── life/
//! │   └── notes.html
//! └── static/             # Copied from template/static/
//!     └── style.css
//! ```
//!
//! Files are overwritten, never deleted: a page whose source was removed
//! stays in the output until the directory is cleaned by hand.

use crate::config::SiteConfig;
use crate::content::{self, ParseError};
use crate::naming;
use crate::render::Renderer;
use crate::scan::{self, ScanError};
use crate::tags::{TagIndex, build_tag_index};
use crate::template::{Template, TemplateError, TemplateKind};
use crate::write::{WriteError, copy_assets, write_output};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the static assets directory inside the output root.
pub const STATIC_OUTPUT_DIR: &str = "static";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Content error: {0}")]
    Parse(#[from] ParseError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

/// One generated page, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    pub title: String,
    pub filename: String,
    /// Output path relative to the output root.
    pub output: PathBuf,
}

/// Generated pages sharing a tag, in index order.
#[derive(Debug, Clone, PartialEq)]
pub struct TagReport {
    pub tag: String,
    pub pages: Vec<PageReport>,
}

/// What a generate run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub tags: Vec<TagReport>,
    pub assets_copied: usize,
}

impl GenerateReport {
    fn new(output_dir: &Path, index: &TagIndex, assets_copied: usize) -> Self {
        let tags = index
            .groups()
            .map(|group| TagReport {
                tag: group.tag.clone(),
                pages: group
                    .entries
                    .iter()
                    .map(|entry| PageReport {
                        title: entry.title.clone(),
                        filename: entry.filename.clone(),
                        output: naming::page_relative_path(&group.tag, &entry.filename),
                    })
                    .collect(),
            })
            .collect();
        Self {
            output_dir: output_dir.to_path_buf(),
            tags,
            assets_copied,
        }
    }

    pub fn page_count(&self) -> usize {
        self.tags.iter().map(|t| t.pages.len()).sum()
    }
}

/// Generate the site for the project at `project_root`.
pub fn generate(config: &SiteConfig, project_root: &Path) -> Result<GenerateReport, GenerateError> {
    let paths = config.paths(project_root);
    tracing::info!(project = %project_root.display(), "generating site");

    let page_template = Template::load(&paths.templates, TemplateKind::Page)?;
    let index_template = Template::load(&paths.templates, TemplateKind::Index)?;

    let sources = scan::scan(&paths.content)?;
    let files = sources
        .iter()
        .map(|source| content::load_content(&source.path))
        .collect::<Result<Vec<_>, _>>()?;
    let index = build_tag_index(&files);
    tracing::debug!(
        files = files.len(),
        tags = index.tag_count(),
        "built tag index"
    );

    let renderer = Renderer::new(config, &paths.output, &page_template, &index_template);
    let pages = files
        .iter()
        .map(|file| renderer.render_page(file))
        .collect::<Result<Vec<_>, _>>()?;
    let rendered_index = renderer.render_index(&index)?;

    let mut written = HashSet::new();
    for page in &pages {
        if !written.insert(page.output_path.as_path()) {
            tracing::warn!(
                path = %page.output_path.display(),
                "two content files map to the same page, the later one wins"
            );
        }
        write_output(&page.output_path, &page.html)?;
    }
    write_output(&rendered_index.output_path, &rendered_index.html)?;

    let assets_copied = copy_assets(&paths.static_assets, &paths.output.join(STATIC_OUTPUT_DIR))?;

    tracing::info!(
        pages = pages.len(),
        assets = assets_copied,
        output = %paths.output.display(),
        "site generated"
    );
    Ok(GenerateReport::new(&paths.output, &index, assets_copied))
}
