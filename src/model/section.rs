//! Section-level types.

use serde::{Deserialize, Serialize};

/// Reserved key for the block preceding the first detected header.
pub const NAME_KEY: &str = "name";

/// Reserved key for contact lines split out of the name block.
pub const CONTACT_KEY: &str = "contact";

/// A classified block of raw résumé text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSection {
    /// Normalized key (lowercase, spaces replaced by underscores)
    pub key: String,

    /// Raw multi-line content, lines joined with `\n`
    pub content: String,
}

impl RawSection {
    /// Create a new raw section.
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
        }
    }

    /// Check if this section uses one of the reserved keys.
    pub fn is_reserved(&self) -> bool {
        self.key == NAME_KEY || self.key == CONTACT_KEY
    }

    /// Content split into lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }
}

/// Ordered mapping from section key to raw content.
///
/// Entries keep encounter order. A key may appear more than once when the
/// same header phrase occurs in different places of the input; such entries
/// are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    entries: Vec<RawSection>,
}

impl SectionMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, key: impl Into<String>, content: impl Into<String>) {
        self.entries.push(RawSection::new(key, content));
    }

    /// Insert an entry at the given position.
    pub fn insert(&mut self, index: usize, section: RawSection) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, section);
    }

    /// First entry with the given key.
    pub fn get(&self, key: &str) -> Option<&RawSection> {
        self.entries.iter().find(|s| s.key == key)
    }

    /// Mutable access to the first entry with the given key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut RawSection> {
        self.entries.iter_mut().find(|s| s.key == key)
    }

    /// Position of the first entry with the given key.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|s| s.key == key)
    }

    /// Check whether the key occurs at least once.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in encounter order (duplicates included).
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.key.as_str()).collect()
    }

    /// Iterate over entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, RawSection> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that are not `name` or `contact`.
    pub fn content_sections(&self) -> impl Iterator<Item = &RawSection> {
        self.entries.iter().filter(|s| !s.is_reserved())
    }
}

impl<'a> IntoIterator for &'a SectionMap {
    type Item = &'a RawSection;
    type IntoIter = std::slice::Iter<'a, RawSection>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A rendered section: display heading plus its paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Display heading (title-cased)
    pub heading: String,

    /// Paragraphs in order; never empty or whitespace-only
    pub paragraphs: Vec<String>,
}

impl Section {
    /// Create a section with no paragraphs.
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            paragraphs: Vec::new(),
        }
    }

    /// Add a paragraph, ignoring text that is blank once control characters
    /// are replaced.
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        let text = text.into();
        let text = crate::render::replace_controls(&text);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.paragraphs.push(trimmed.to_string());
        }
    }

    /// Builder variant of [`Section::add_paragraph`].
    pub fn with_paragraph(mut self, text: impl Into<String>) -> Self {
        self.add_paragraph(text);
        self
    }

    /// Check if the section has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}
