//! Tag index: content files grouped by tag for the index page.
//!
//! Groups keep first-seen order and entries keep file-processing order.
//! Nothing is sorted; a site whose files are listed `b.md, a.md` shows `b`
//! first. Tags compare as exact strings, so `Rust` and `rust` are two groups.

use crate::content::ContentFile;
use indexmap::IndexMap;

/// One index entry: the page's source filename and its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub filename: String,
    pub title: String,
}

/// All entries sharing one tag, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    pub tag: String,
    pub entries: Vec<TagEntry>,
}

/// Insertion-ordered tag groups.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    groups: IndexMap<String, TagGroup>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `file` to its tag's group, creating the group on first sight.
    pub fn insert(&mut self, file: &ContentFile) {
        self.groups
            .entry(file.tag.clone())
            .or_insert_with(|| TagGroup {
                tag: file.tag.clone(),
                entries: Vec::new(),
            })
            .entries
            .push(TagEntry {
                filename: file.filename.clone(),
                title: file.title.clone(),
            });
    }

    /// Groups in first-seen order.
    pub fn groups(&self) -> impl Iterator<Item = &TagGroup> {
        self.groups.values()
    }

    pub fn get(&self, tag: &str) -> Option<&TagGroup> {
        self.groups.get(tag)
    }

    pub fn tag_count(&self) -> usize {
        self.groups.len()
    }

    /// Total entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.groups.values().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Build the tag index from files in scan order.
pub fn build_tag_index(files: &[ContentFile]) -> TagIndex {
    let mut index = TagIndex::new();
    for file in files {
        index.insert(file);
    }
    index
}
