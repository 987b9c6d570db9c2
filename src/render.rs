//! Page and index rendering.
//!
//! Rendering is pure: it turns parsed content plus the site config into HTML
//! strings and their output paths. Nothing touches the filesystem here; see
//! [`crate::write`] for that. The same inputs always render the same bytes.

use crate::config::SiteConfig;
use crate::content::ContentFile;
use crate::markdown;
use crate::naming;
use crate::tags::TagIndex;
use crate::template::{Field, Template, TemplateError, TemplateValues};
use std::path::{Path, PathBuf};

/// A rendered content page: `<output>/<tag>/<stem>.html`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub output_path: PathBuf,
    pub html: String,
}

/// The rendered index page: `<output>/index.html`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedIndex {
    pub output_path: PathBuf,
    pub html: String,
}

/// Renders pages and the index for one site.
pub struct Renderer<'a> {
    config: &'a SiteConfig,
    output_root: &'a Path,
    page_template: &'a Template,
    index_template: &'a Template,
}

impl<'a> Renderer<'a> {
    pub fn new(
        config: &'a SiteConfig,
        output_root: &'a Path,
        page_template: &'a Template,
        index_template: &'a Template,
    ) -> Self {
        Self {
            config,
            output_root,
            page_template,
            index_template,
        }
    }

    /// Values shared by both templates.
    fn site_values(&self) -> TemplateValues<'a> {
        TemplateValues::new()
            .with(Field::Root, &self.config.root)
            .with(Field::SiteUrl, self.config.site_url.as_deref().unwrap_or(""))
            .with(Field::Year, &self.config.year)
            .with(Field::Author, &self.config.author)
    }

    pub fn render_page(&self, file: &ContentFile) -> Result<RenderedPage, TemplateError> {
        let content = markdown::to_html(&file.body);
        let values = self
            .site_values()
            .with(Field::Title, &file.title)
            .with(Field::Tag, &file.tag)
            .with(Field::Content, &content);
        let html = self.page_template.render(&values)?;

        Ok(RenderedPage {
            output_path: self
                .output_root
                .join(naming::page_relative_path(&file.tag, &file.filename)),
            html,
        })
    }

    pub fn render_index(&self, index: &TagIndex) -> Result<RenderedIndex, TemplateError> {
        let content = markdown::to_html(&index_markdown(index, &self.config.root));
        let values = self
            .site_values()
            .with(Field::Title, &self.config.title)
            .with(Field::Content, &content);
        let html = self.index_template.render(&values)?;

        Ok(RenderedIndex {
            output_path: self.output_root.join("index.html"),
            html,
        })
    }
}

/// Escape the characters that would end or break a link's text.
fn link_text(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if matches!(c, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// The index listing as markdown: a `## tag` heading per group followed by
/// one `- [title](link)` line per entry.
pub fn index_markdown(index: &TagIndex, root: &str) -> String {
    let mut lines = Vec::with_capacity(index.tag_count() + index.entry_count());
    for group in index.groups() {
        lines.push(format!("## {}", group.tag));
        for entry in &group.entries {
            let link = naming::page_link(root, &group.tag, &entry.filename);
            lines.push(format!("- [{}]({})", link_text(&entry.title), link));
        }
    }
    lines.join("\n")
}
