//! Visitor walk over the document model.
//!
//! Every output path (PDF, DOCX, text preview, element listing) drives the
//! same walk, so they agree on element order and on contact handling.
//!
//! # Example
//!
//! ```
//! use resumedoc::render::visitor::{walk, ContactBlock, DocumentVisitor};
//! use resumedoc::render::RenderOptions;
//! use resumedoc::{ResumeDocument, Result, Section};
//!
//! #[derive(Default)]
//! struct HeadingCounter(usize);
//!
//! impl DocumentVisitor for HeadingCounter {
//!     fn visit_heading(&mut self, _heading: &str) -> Result<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let doc = ResumeDocument::new().with_section(Section::new("Skills"));
//! let mut counter = HeadingCounter::default();
//! walk(&doc, &RenderOptions::default(), &mut counter).unwrap();
//! assert_eq!(counter.0, 1);
//! ```

use crate::error::Result;
use crate::model::ResumeDocument;

use super::RenderOptions;

/// Contact content as presented to a visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactBlock<'a> {
    /// Non-blank contact lines, trimmed, in order
    Lines(Vec<&'a str>),
    /// Contact existed but was blank; carries the placeholder text
    Placeholder(&'a str),
}

impl<'a> ContactBlock<'a> {
    /// Lines to display, one per row.
    pub fn rows(&self) -> Vec<&'a str> {
        match self {
            ContactBlock::Lines(lines) => lines.clone(),
            ContactBlock::Placeholder(text) => vec![*text],
        }
    }

    /// Check if this is the placeholder form.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ContactBlock::Placeholder(_))
    }
}

/// Callbacks for each model element, in document order.
///
/// All methods default to doing nothing.
pub trait DocumentVisitor {
    /// Called once with the title, if present.
    fn visit_title(&mut self, title: &str) -> Result<()> {
        let _ = title;
        Ok(())
    }

    /// Called once with the contact block, if contact is present.
    fn visit_contact(&mut self, contact: &ContactBlock<'_>) -> Result<()> {
        let _ = contact;
        Ok(())
    }

    /// Called at the start of each section.
    fn visit_heading(&mut self, heading: &str) -> Result<()> {
        let _ = heading;
        Ok(())
    }

    /// Called for each paragraph of the current section.
    fn visit_paragraph(&mut self, text: &str) -> Result<()> {
        let _ = text;
        Ok(())
    }

    /// Called after the last paragraph of each section.
    fn end_section(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Walk a document: title, contact, then each section's heading and paragraphs.
pub fn walk<V>(doc: &ResumeDocument, options: &RenderOptions, visitor: &mut V) -> Result<()>
where
    V: DocumentVisitor + ?Sized,
{
    if let Some(ref title) = doc.title {
        visitor.visit_title(title)?;
    }

    if doc.contact.is_some() {
        let lines = doc.contact_lines();
        let block = if lines.is_empty() {
            log::warn!("contact block is blank; rendering placeholder");
            ContactBlock::Placeholder(&options.contact_placeholder)
        } else {
            ContactBlock::Lines(lines)
        };
        visitor.visit_contact(&block)?;
    }

    for section in &doc.sections {
        visitor.visit_heading(&section.heading)?;
        for paragraph in &section.paragraphs {
            visitor.visit_paragraph(paragraph)?;
        }
        visitor.end_section()?;
    }

    Ok(())
}
