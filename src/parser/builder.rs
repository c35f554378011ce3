//! Assembly of classified sections into the canonical document model.

use crate::model::{Metadata, ResumeDocument, Section, SectionMap};
use crate::render::replace_controls;

use super::contact::ContactSplit;

/// Builds a [`ResumeDocument`] from classifier output.
#[derive(Debug, Clone, Default)]
pub struct DocumentModelBuilder {
    metadata: Metadata,
}

impl DocumentModelBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach generation metadata to built documents.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Build the document from sections and the title/contact split.
    pub fn build(&self, sections: &SectionMap, split: ContactSplit) -> ResumeDocument {
        let sections = sections
            .content_sections()
            .map(|raw| Section {
                heading: display_heading(&raw.key),
                paragraphs: split_paragraphs(&raw.content),
            })
            .collect();

        ResumeDocument {
            title: split.title,
            contact: split.contact,
            sections,
            metadata: self.metadata.clone(),
        }
    }
}

/// Display text for a section key: underscores to spaces, title-cased.
pub fn display_heading(key: &str) -> String {
    title_case(&key.replace('_', " "))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}

/// Split content on blank-line boundaries, trimming and dropping empties.
///
/// Control characters other than tab and newline become spaces first, so a
/// paragraph made only of them counts as blank.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .map(|p| replace_controls(p).trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
