//! # Arco
//!
//! A minimal static blog generator. A directory of markdown files, each
//! starting with a two-line `Title:` / `Tag:` header, becomes one HTML page
//! per file plus an index page listing every page under its tag.
//!
//! # Pipeline
//!
//! ```text
//! md/*.md ──scan──▶ sources ──parse──▶ ContentFile ──┬──▶ page per file
//!                                                    └──▶ TagIndex ──▶ index.html
//! template/static/ ─────────────────────────────────────▶ output/static/
//! ```
//!
//! Everything is rendered in memory before the first write, so a malformed
//! content header or a template with the wrong placeholders leaves the
//! output directory as it was. `deploy` is a separate step that commits the
//! output directory and pushes it with git.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` (or legacy `config.json`) loading and validation |
//! | [`scan`] | Lists the content files in the content directory |
//! | [`content`] | Title/Tag header parsing and generation |
//! | [`naming`] | File stems and page paths/links derived from them |
//! | [`tags`] | Insertion-ordered grouping of pages by tag |
//! | [`markdown`] | Markdown → HTML with heading ids, `[TOC]` and code wrappers |
//! | [`template`] | Placeholder templates, checked against what each page kind needs |
//! | [`render`] | Pure page and index rendering |
//! | [`write`] | Atomic file writes and static asset copying |
//! | [`generate`] | The generate command: runs the pipeline above |
//! | [`create`] | The new command: writes a header-only content file |
//! | [`deploy`] | The deploy command: commits and pushes the output with git |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Templates
//!
//! Templates use named placeholders (`{title}`, `{content}`, ...) with `{{`
//! and `}}` as literal braces. Older templates written with bare `{}`
//! positional slots still load when they have exactly the slots the page
//! kind expects. See [`template`] for the field lists.

pub mod config;
pub mod content;
pub mod create;
pub mod deploy;
pub mod generate;
pub mod logging;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod tags;
pub mod template;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;
