//! Document-level types.

use super::Section;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A résumé in canonical form, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    /// First line of the name block
    pub title: Option<String>,

    /// Lines following the title in the name block; `Some("")` means the
    /// block had trailing lines that were all blank
    pub contact: Option<String>,

    /// Content sections in encounter order (never `name` or `contact`)
    pub sections: Vec<Section>,

    /// Generation metadata (cosmetic only)
    #[serde(default)]
    pub metadata: Metadata,
}

impl ResumeDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the contact block.
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Append a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Add a section to the document.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Check if the document has nothing to render.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.contact.is_none() && self.sections.is_empty()
    }

    /// Non-blank contact lines, trimmed. Empty when contact is absent or blank.
    pub fn contact_lines(&self) -> Vec<&str> {
        self.contact
            .as_deref()
            .map(|c| {
                c.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total paragraphs across all sections.
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }

    /// First section with the given display heading.
    pub fn get_section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        let mut blocks = Vec::new();
        if let Some(ref title) = self.title {
            blocks.push(title.clone());
        }
        if let Some(ref contact) = self.contact {
            if !contact.trim().is_empty() {
                blocks.push(contact.clone());
            }
        }
        for section in &self.sections {
            blocks.push(section.heading.clone());
            blocks.extend(section.paragraphs.iter().cloned());
        }
        blocks.join("\n\n")
    }
}

/// Generation metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Filename suggested by the caller
    pub source_filename: Option<String>,

    /// When the document was generated
    pub generated_at: Option<DateTime<Utc>>,

    /// Number of input lines scanned
    pub line_count: usize,
}

impl Metadata {
    /// Generation time in PDF date syntax (`D:YYYYMMDDHHmmSSZ`).
    pub fn pdf_date(&self) -> Option<String> {
        self.generated_at
            .map(|t| t.format("D:%Y%m%d%H%M%SZ").to_string())
    }
}
