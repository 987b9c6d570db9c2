//! Page and index templates.
//!
//! Templates are plain HTML files with named placeholders:
//!
//! ```html
//! <title>{title}</title>
//! <link rel="stylesheet" href="{root}static/style.css">
//! <main>{content}</main>
//! <footer>&copy; {year} {author}</footer>
//! ```
//!
//! | Placeholder | Page | Index |
//! |-------------|------|-------|
//! | `{title}`   | required | required |
//! | `{root}`    | required | required |
//! | `{content}` | required | required |
//! | `{year}`    | required | required |
//! | `{author}`  | required | required |
//! | `{site_url}`| optional | optional |
//! | `{tag}`     | optional | not allowed |
//!
//! A template that leaves out a required placeholder or uses one it may not
//! use is rejected when it is loaded, before any page is rendered.
//! Placeholders may repeat. Literal braces are written `{{` and `}}`.
//!
//! ## Positional Templates
//!
//! Templates written for older releases use bare `{}` slots filled in a
//! fixed order. They are still accepted when the slot count matches one of
//! the historical layouts:
//!
//! - page, 6 slots: title, root, root, content, year, author
//! - page, 7 slots: title, root, root, content, site_url, year, author
//! - index, 6 slots: title, root, title, content, year, author
//!
//! Any other count is a mismatch. A template cannot mix `{}` and named slots.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A value a template can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Root,
    Content,
    SiteUrl,
    Year,
    Author,
    Tag,
}

impl Field {
    const ALL: [Field; 7] = [
        Field::Title,
        Field::Root,
        Field::Content,
        Field::SiteUrl,
        Field::Year,
        Field::Author,
        Field::Tag,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Root => "root",
            Field::Content => "content",
            Field::SiteUrl => "site_url",
            Field::Year => "year",
            Field::Author => "author",
            Field::Tag => "tag",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the two templates a [`Template`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Page,
    Index,
}

const PAGE_REQUIRED: &[Field] = &[
    Field::Title,
    Field::Root,
    Field::Content,
    Field::Year,
    Field::Author,
];
const PAGE_OPTIONAL: &[Field] = &[Field::SiteUrl, Field::Tag];
const PAGE_LAYOUTS: &[&[Field]] = &[
    &[
        Field::Title,
        Field::Root,
        Field::Root,
        Field::Content,
        Field::Year,
        Field::Author,
    ],
    &[
        Field::Title,
        Field::Root,
        Field::Root,
        Field::Content,
        Field::SiteUrl,
        Field::Year,
        Field::Author,
    ],
];

const INDEX_REQUIRED: &[Field] = PAGE_REQUIRED;
const INDEX_OPTIONAL: &[Field] = &[Field::SiteUrl];
const INDEX_LAYOUTS: &[&[Field]] = &[&[
    Field::Title,
    Field::Root,
    Field::Title,
    Field::Content,
    Field::Year,
    Field::Author,
]];

impl TemplateKind {
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Page => "page",
            TemplateKind::Index => "index",
        }
    }

    /// File name inside the template directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::Page => "page.html",
            TemplateKind::Index => "index.html",
        }
    }

    fn required(self) -> &'static [Field] {
        match self {
            TemplateKind::Page => PAGE_REQUIRED,
            TemplateKind::Index => INDEX_REQUIRED,
        }
    }

    fn optional(self) -> &'static [Field] {
        match self {
            TemplateKind::Page => PAGE_OPTIONAL,
            TemplateKind::Index => INDEX_OPTIONAL,
        }
    }

    fn layouts(self) -> &'static [&'static [Field]] {
        match self {
            TemplateKind::Page => PAGE_LAYOUTS,
            TemplateKind::Index => INDEX_LAYOUTS,
        }
    }

    fn allows(self, field: Field) -> bool {
        self.required().contains(&field) || self.optional().contains(&field)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a template's placeholders differ from what its kind expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Named {
        missing: Vec<Field>,
        unexpected: Vec<String>,
    },
    Positional {
        expected: Vec<usize>,
        found: usize,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Named {
                missing,
                unexpected,
            } => {
                let mut parts = Vec::new();
                if !missing.is_empty() {
                    let names: Vec<String> = missing.iter().map(|f| format!("{{{f}}}")).collect();
                    parts.push(format!("missing {}", names.join(", ")));
                }
                if !unexpected.is_empty() {
                    let names: Vec<String> =
                        unexpected.iter().map(|n| format!("{{{n}}}")).collect();
                    parts.push(format!("unexpected {}", names.join(", ")));
                }
                f.write_str(&parts.join("; "))
            }
            Mismatch::Positional { expected, found } => {
                let expected: Vec<String> = expected.iter().map(|n| n.to_string()).collect();
                write!(
                    f,
                    "found {found} positional placeholders, expected {}",
                    expected.join(" or ")
                )
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error reading template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Syntax error in {template} template: {detail}")]
    Syntax {
        template: TemplateKind,
        detail: String,
    },
    #[error("Template mismatch in {template} template: {mismatch}")]
    Mismatch {
        template: TemplateKind,
        mismatch: Mismatch,
    },
    #[error("No value for {{{field}}} in {template} template")]
    Unfilled { template: TemplateKind, field: Field },
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Slot(Field),
}

/// A parsed template whose placeholders match its kind.
#[derive(Debug, Clone)]
pub struct Template {
    kind: TemplateKind,
    segments: Vec<Segment>,
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateValues<'a> {
    values: BTreeMap<Field, &'a str>,
}

impl<'a> TemplateValues<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, value: &'a str) -> Self {
        self.values.insert(field, value);
        self
    }

    pub fn get(&self, field: Field) -> Option<&'a str> {
        self.values.get(&field).copied()
    }
}

enum Raw<'s> {
    Literal(String),
    Placeholder(&'s str),
}

/// Split a template into literals and placeholder names. `{}` yields an
/// empty name.
fn tokenize(kind: TemplateKind, source: &str) -> Result<Vec<Raw<'_>>, TemplateError> {
    let syntax = |detail: String| TemplateError::Syntax {
        template: kind,
        detail,
    };

    let mut out = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        match c {
            '{' if next == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '}' if next == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let end = loop {
                    match chars.next() {
                        Some((end, '}')) => break end,
                        Some((_, '{' | '\n')) | None => {
                            return Err(syntax(format!("unclosed `{{` at byte {pos}")));
                        }
                        Some(_) => {}
                    }
                };
                if !literal.is_empty() {
                    out.push(Raw::Literal(std::mem::take(&mut literal)));
                }
                out.push(Raw::Placeholder(source[pos + 1..end].trim()));
            }
            '}' => return Err(syntax(format!("single `}}` at byte {pos}"))),
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        out.push(Raw::Literal(literal));
    }
    Ok(out)
}

impl Template {
    /// Parse `source` and check its placeholders against `kind`.
    pub fn parse(kind: TemplateKind, source: &str) -> Result<Template, TemplateError> {
        let raw = tokenize(kind, source)?;
        let names: Vec<&str> = raw
            .iter()
            .filter_map(|r| match r {
                Raw::Placeholder(name) => Some(*name),
                Raw::Literal(_) => None,
            })
            .collect();
        let positional = names.iter().filter(|n| n.is_empty()).count();

        let mismatch = |mismatch| TemplateError::Mismatch {
            template: kind,
            mismatch,
        };

        let mut slots: Vec<Field> = Vec::with_capacity(names.len());
        if positional > 0 {
            if positional != names.len() {
                return Err(TemplateError::Syntax {
                    template: kind,
                    detail: "cannot mix `{}` with named placeholders".to_string(),
                });
            }
            let layout = kind
                .layouts()
                .iter()
                .find(|layout| layout.len() == positional)
                .ok_or_else(|| {
                    mismatch(Mismatch::Positional {
                        expected: kind.layouts().iter().map(|l| l.len()).collect(),
                        found: positional,
                    })
                })?;
            slots.extend_from_slice(layout);
        } else {
            let mut unexpected = Vec::new();
            for name in &names {
                match Field::from_name(name).filter(|f| kind.allows(*f)) {
                    Some(field) => slots.push(field),
                    None => unexpected.push(name.to_string()),
                }
            }
            let used: BTreeSet<Field> = slots.iter().copied().collect();
            let missing: Vec<Field> = kind
                .required()
                .iter()
                .copied()
                .filter(|f| !used.contains(f))
                .collect();
            if !missing.is_empty() || !unexpected.is_empty() {
                return Err(mismatch(Mismatch::Named {
                    missing,
                    unexpected,
                }));
            }
        }

        let mut slots = slots.into_iter();
        let mut segments = Vec::with_capacity(raw.len());
        for r in raw {
            match r {
                Raw::Literal(text) => segments.push(Segment::Literal(text)),
                Raw::Placeholder(_) => {
                    if let Some(field) = slots.next() {
                        segments.push(Segment::Slot(field));
                    }
                }
            }
        }

        Ok(Template { kind, segments })
    }

    /// Read `<dir>/<kind file name>` and parse it.
    pub fn load(dir: &Path, kind: TemplateKind) -> Result<Template, TemplateError> {
        let path = dir.join(kind.file_name());
        let source = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        Template::parse(kind, &source)
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Substitute `values` into the template.
    pub fn render(&self, values: &TemplateValues<'_>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(field) => {
                    let value = values.get(*field).ok_or(TemplateError::Unfilled {
                        template: self.kind,
                        field: *field,
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
