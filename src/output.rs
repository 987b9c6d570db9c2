//! CLI output formatting for every command.
//!
//! Output is **content-first**: each page leads with its position and title,
//! with the file it came from shown as an indented `Source:` line. Paths are
//! printed relative to the project or output root.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! tech (2 pages)
//!     001 Hello Rust → tech/hello-rust.html
//!         Source: hello-rust.md
//!     002 Toolchain → tech/toolchain.html
//!         Source: toolchain.md
//! life (1 page)
//!     001 Notes → life/notes.html
//!         Source: notes.md
//! Assets: 1 file → static/
//!
//! Generated 3 pages in 2 tags → output
//! ```
//!
//! ## New
//!
//! ```text
//! Created md/hello.md
//!     Title: Hello
//!     Tag: demo
//! ```
//!
//! ## Deploy
//!
//! ```text
//! Initialized git repository in output
//! Committed: Updated 2024-05-01 18:30:00
//! Pushed → git@example.org:me/blog.git (master)
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::deploy::DeployReport;
use crate::generate::{GenerateReport, STATIC_OUTPUT_DIR};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// `path` relative to `base` when it lies inside it, unchanged otherwise.
fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// generate
// ============================================================================

/// Format the pages written by a generate run, grouped by tag in index
/// order.
pub fn format_generate_output(report: &GenerateReport, project_root: &Path) -> Vec<String> {
    let mut lines = vec!["Home \u{2192} index.html".to_string()];

    for tag in &report.tags {
        lines.push(format!("{} ({})", tag.tag, plural(tag.pages.len(), "page", "pages")));
        for (idx, page) in tag.pages.iter().enumerate() {
            lines.push(format!(
                "{}{} {} \u{2192} {}",
                indent(1),
                format_index(idx + 1),
                page.title,
                page.output.display()
            ));
            lines.push(format!("{}Source: {}", indent(2), page.filename));
        }
    }

    if report.assets_copied > 0 {
        lines.push(format!(
            "Assets: {} \u{2192} {}/",
            plural(report.assets_copied, "file", "files"),
            STATIC_OUTPUT_DIR
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} in {} \u{2192} {}",
        plural(report.page_count(), "page", "pages"),
        plural(report.tags.len(), "tag", "tags"),
        display_relative(&report.output_dir, project_root)
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport, project_root: &Path) {
    print_lines(&format_generate_output(report, project_root));
}

// ============================================================================
// new
// ============================================================================

pub fn format_new_page(path: &Path, project_root: &Path, title: &str, tag: &str) -> Vec<String> {
    vec![
        format!("Created {}", display_relative(path, project_root)),
        format!("{}Title: {}", indent(1), title),
        format!("{}Tag: {}", indent(1), tag),
    ]
}

pub fn print_new_page(path: &Path, project_root: &Path, title: &str, tag: &str) {
    print_lines(&format_new_page(path, project_root, title, tag));
}

// ============================================================================
// deploy
// ============================================================================

pub fn format_deploy_output(report: &DeployReport, output_dir: &Path, project_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    if report.initialized {
        lines.push(format!(
            "Initialized git repository in {}",
            display_relative(output_dir, project_root)
        ));
    }
    match &report.commit {
        Some(message) => lines.push(format!("Committed: {}", message)),
        None => lines.push("Nothing to commit".to_string()),
    }
    lines.push(format!(
        "Pushed \u{2192} {} ({})",
        report.repo, report.branch
    ));
    lines
}

pub fn print_deploy_output(report: &DeployReport, output_dir: &Path, project_root: &Path) {
    print_lines(&format_deploy_output(report, output_dir, project_root));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{PageReport, TagReport};
    use std::path::PathBuf;

    fn page(title: &str, filename: &str, output: &str) -> PageReport {
        PageReport {
            title: title.to_string(),
            filename: filename.to_string(),
            output: PathBuf::from(output),
        }
    }

    fn report() -> GenerateReport {
        GenerateReport {
            output_dir: PathBuf::from("/site/output"),
            tags: vec![
                TagReport {
                    tag: "tech".to_string(),
                    pages: vec![
                        page("Hello Rust", "hello-rust.md", "tech/hello-rust.html"),
                        page("Toolchain", "toolchain.md", "tech/toolchain.html"),
                    ],
                },
                TagReport {
                    tag: "life".to_string(),
                    pages: vec![page("Notes", "notes.md", "life/notes.html")],
                },
            ],
            assets_copied: 1,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(0, "page", "pages"), "0 pages");
        assert_eq!(plural(1, "page", "pages"), "1 page");
        assert_eq!(plural(2, "page", "pages"), "2 pages");
    }

    #[test]
    fn display_relative_outside_base_is_unchanged() {
        assert_eq!(
            display_relative(Path::new("/elsewhere/out"), Path::new("/site")),
            "/elsewhere/out"
        );
    }

    // =========================================================================
    // generate
    // =========================================================================

    #[test]
    fn generate_output_full() {
        let lines = format_generate_output(&report(), Path::new("/site"));
        assert_eq!(
            lines,
            vec![
                "Home \u{2192} index.html",
                "tech (2 pages)",
                "    001 Hello Rust \u{2192} tech/hello-rust.html",
                "        Source: hello-rust.md",
                "    002 Toolchain \u{2192} tech/toolchain.html",
                "        Source: toolchain.md",
                "life (1 page)",
                "    001 Notes \u{2192} life/notes.html",
                "        Source: notes.md",
                "Assets: 1 file \u{2192} static/",
                "",
                "Generated 3 pages in 2 tags \u{2192} output",
            ]
        );
    }

    #[test]
    fn generate_output_empty_site() {
        let report = GenerateReport {
            output_dir: PathBuf::from("/site/output"),
            tags: vec![],
            assets_copied: 0,
        };
        let lines = format_generate_output(&report, Path::new("/site"));
        assert_eq!(
            lines,
            vec![
                "Home \u{2192} index.html",
                "",
                "Generated 0 pages in 0 tags \u{2192} output",
            ]
        );
    }

    // =========================================================================
    // new
    // =========================================================================

    #[test]
    fn new_page_output() {
        let lines = format_new_page(
            Path::new("/site/md/hello.md"),
            Path::new("/site"),
            "Hello",
            "demo",
        );
        assert_eq!(lines, vec!["Created md/hello.md", "    Title: Hello", "    Tag: demo"]);
    }

    // =========================================================================
    // deploy
    // =========================================================================

    #[test]
    fn deploy_output_first_run() {
        let report = DeployReport {
            repo: "git@example.org:me/blog.git".to_string(),
            branch: "master".to_string(),
            initialized: true,
            commit: Some("Updated 2024-05-01 18:30:00".to_string()),
        };
        let lines = format_deploy_output(&report, Path::new("/site/output"), Path::new("/site"));
        assert_eq!(
            lines,
            vec![
                "Initialized git repository in output",
                "Committed: Updated 2024-05-01 18:30:00",
                "Pushed \u{2192} git@example.org:me/blog.git (master)",
            ]
        );
    }

    #[test]
    fn deploy_output_nothing_to_commit() {
        let report = DeployReport {
            repo: "r".to_string(),
            branch: "gh-pages".to_string(),
            initialized: false,
            commit: None,
        };
        let lines = format_deploy_output(&report, Path::new("/o"), Path::new("/site"));
        assert_eq!(lines, vec!["Nothing to commit", "Pushed \u{2192} r (gh-pages)"]);
    }
}
