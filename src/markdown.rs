//! Markdown to HTML conversion.
//!
//! A thin layer over [`pulldown_cmark`] that adds what the site's
//! stylesheets and older content rely on:
//!
//! - **Tables, footnotes, strikethrough, task lists** via parser options.
//! - **Heading ids**: every heading gets a slug id (`## Getting Started` →
//!   `id="getting-started"`). Repeated slugs get `_1`, `_2`, ... suffixes.
//!   An explicit `{#id}` attribute wins.
//! - **`[TOC]`**: a paragraph consisting of exactly `[TOC]` is replaced by a
//!   nested list linking to every heading, wrapped in `<div class="toc">`.
//! - **Code blocks** are highlighted with [`syntect`] and wrapped in
//!   `<div class="codehilite">`. Tokens become `<span>`s carrying their
//!   scope names as classes (`<span class="storage type function rust">`),
//!   so colours come from the theme's stylesheet, not inline styles. The
//!   language is the first word of the fence's info string; unknown or
//!   missing languages are emitted as plain text. Fenced blocks keep
//!   pulldown's `language-*` class on the `<code>` element.
//!
//! The conversion is a pure function of its input.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, html};
use std::collections::HashSet;
use std::sync::LazyLock;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

const TOC_MARKER: &str = "[TOC]";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Convert markdown to an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let mut events: Vec<Event> = Parser::new_ext(markdown, options()).collect();
    let toc = assign_heading_ids(&mut events);
    let events = expand(events, &toc);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

#[derive(Debug, Clone, PartialEq)]
struct TocEntry {
    level: usize,
    id: String,
    text: String,
}

/// Text content of the events up to the next `End`, flattened.
fn inline_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

fn unique_slug(text: &str, used: &mut HashSet<String>) -> String {
    let mut base = slug::slugify(text);
    if base.is_empty() {
        base = "section".to_string();
    }
    let mut candidate = base.clone();
    let mut n = 1;
    while used.contains(&candidate) {
        candidate = format!("{base}_{n}");
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Give every heading an id and collect the table of contents.
fn assign_heading_ids(events: &mut [Event]) -> Vec<TocEntry> {
    let mut used = HashSet::new();
    let mut toc = Vec::new();

    for i in 0..events.len() {
        let (level, explicit) = match &events[i] {
            Event::Start(Tag::Heading { level, id, .. }) => {
                (*level as usize, id.as_ref().map(|id| id.to_string()))
            }
            _ => continue,
        };
        let text = inline_text(&events[i + 1..]);
        let id = match explicit {
            Some(id) => {
                used.insert(id.clone());
                id
            }
            None => {
                let id = unique_slug(&text, &mut used);
                if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[i] {
                    *slot = Some(CowStr::from(id.clone()));
                }
                id
            }
        };
        toc.push(TocEntry { level, id, text });
    }
    toc
}

/// If `events` starts with a paragraph holding only `[TOC]`, return its
/// length in events.
fn toc_marker_len(events: &[Event]) -> Option<usize> {
    if !matches!(events.first(), Some(Event::Start(Tag::Paragraph))) {
        return None;
    }
    let mut text = String::new();
    for (offset, event) in events.iter().enumerate().skip(1) {
        match event {
            Event::Text(t) => text.push_str(t),
            Event::End(TagEnd::Paragraph) => {
                return (text.trim() == TOC_MARKER).then_some(offset + 1);
            }
            _ => return None,
        }
    }
    None
}

fn toc_events(entries: &[TocEntry]) -> Vec<Event<'static>> {
    let mut out = vec![Event::Html(CowStr::from("<div class=\"toc\">\n"))];
    let mut levels: Vec<usize> = Vec::new();

    for entry in entries {
        while levels.len() > 1 && levels.last().is_some_and(|&top| entry.level < top) {
            out.push(Event::End(TagEnd::Item));
            out.push(Event::End(TagEnd::List(false)));
            levels.pop();
        }
        match levels.last() {
            Some(&top) if entry.level <= top => out.push(Event::End(TagEnd::Item)),
            _ => {
                out.push(Event::Start(Tag::List(None)));
                levels.push(entry.level);
            }
        }
        out.push(Event::Start(Tag::Item));
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: CowStr::from(format!("#{}", entry.id)),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        out.push(Event::Text(CowStr::from(entry.text.clone())));
        out.push(Event::End(TagEnd::Link));
    }
    for _ in &levels {
        out.push(Event::End(TagEnd::Item));
        out.push(Event::End(TagEnd::List(false)));
    }

    out.push(Event::Html(CowStr::from("</div>\n")));
    out
}

/// Highlight `code` as `language`, falling back to plain text.
fn highlight(code: &str, language: Option<&str>) -> Result<String, syntect::Error> {
    let syntaxes = &*SYNTAXES;
    let syntax = language
        .and_then(|lang| syntaxes.find_syntax_by_token(lang))
        .unwrap_or_else(|| syntaxes.find_syntax_plain_text());

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, syntaxes, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

fn fence_language<'a>(kind: &'a CodeBlockKind) -> Option<&'a str> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next(),
        CodeBlockKind::Indented => None,
    }
}

/// Events for one code block: `events` starts at its `Start` and runs
/// through its `End`.
fn code_block_events<'a>(events: &[Event<'a>], kind: &CodeBlockKind) -> Vec<Event<'a>> {
    let body = events.get(1..events.len() - 1).unwrap_or_default();
    let mut code = String::new();
    for event in body {
        if let Event::Text(text) = event {
            code.push_str(text);
        }
    }

    let mut out = vec![
        Event::Html(CowStr::from("<div class=\"codehilite\">\n")),
        events[0].clone(),
    ];
    let language = fence_language(kind);
    match highlight(&code, language) {
        Ok(highlighted) => out.push(Event::Html(CowStr::from(highlighted))),
        Err(e) => {
            tracing::warn!(
                language = language.unwrap_or(""),
                error = %e,
                "highlighting failed, emitting plain code"
            );
            out.extend(body.iter().cloned());
        }
    }
    out.push(Event::End(TagEnd::CodeBlock));
    out.push(Event::Html(CowStr::from("</div>\n")));
    out
}

/// Replace `[TOC]` paragraphs and highlight code blocks.
fn expand<'a>(events: Vec<Event<'a>>, toc: &[TocEntry]) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;
    while i < events.len() {
        if let Some(len) = toc_marker_len(&events[i..]) {
            out.extend(toc_events(toc));
            i += len;
            continue;
        }
        if let Event::Start(Tag::CodeBlock(kind)) = &events[i] {
            let end = events[i..]
                .iter()
                .position(|e| matches!(e, Event::End(TagEnd::CodeBlock)))
                .map_or(events.len() - 1, |offset| i + offset);
            out.extend(code_block_events(&events[i..=end], kind));
            i = end + 1;
            continue;
        }
        out.push(events[i].clone());
        i += 1;
    }
    out
}
