//! Filename conventions shared by the renderers.
//!
//! A content file `md/hello.md` tagged `rust` becomes the page
//! `<output>/rust/hello.html`, linked from the index as `<root>rust/hello.html`.
//! Both sides derive the name from [`file_stem`] so they always agree.
//!
//! ## First-Dot Truncation
//!
//! The stem is everything before the *first* dot, not the last:
//! - `post.md` → `post`
//! - `a.b.md` → `a`
//! - `README` → `README`
//!
//! Sites generated by earlier releases were published with this rule, so
//! changing it would break existing links.

use std::path::{Path, PathBuf};

/// Strip everything from the first `.` onwards.
pub fn file_stem(filename: &str) -> &str {
    match filename.find('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    }
}

/// Output path of a page, relative to the output root: `<tag>/<stem>.html`.
pub fn page_relative_path(tag: &str, filename: &str) -> PathBuf {
    Path::new(tag).join(format!("{}.html", file_stem(filename)))
}

/// Index link to a page: `<root><tag>/<stem>.html`.
///
/// `root` is prepended verbatim, so it normally ends with a slash. The tag
/// and stem are percent-encoded (`machine learning` → `machine%20learning`).
pub fn page_link(root: &str, tag: &str, filename: &str) -> String {
    format!(
        "{}{}/{}.html",
        root,
        urlencoding::encode(tag),
        urlencoding::encode(file_stem(filename))
    )
}
