//! Read rendered documents back into a flat element list.
//!
//! Both renderers tag their output (marked content in PDF, paragraph styles
//! in DOCX), so the element sequence can be recovered and compared against
//! the sequence the model itself predicts.

#[cfg(feature = "docx")]
mod docx;
#[cfg(feature = "pdf")]
mod pdf;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::ResumeDocument;
use crate::render::visitor::{walk, ContactBlock, DocumentVisitor};
use crate::render::{replace_controls, OutputFormat, RenderOptions};

#[cfg(feature = "docx")]
pub use docx::docx_elements;
#[cfg(feature = "pdf")]
pub use pdf::pdf_elements;

/// Role of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Document title
    Title,
    /// Contact block
    Contact,
    /// Section heading
    Heading,
    /// Body paragraph
    Paragraph,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ElementKind::Title => "title",
            ElementKind::Contact => "contact",
            ElementKind::Heading => "heading",
            ElementKind::Paragraph => "paragraph",
        };
        f.write_str(label)
    }
}

/// One rendered element with normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element role
    pub kind: ElementKind,
    /// Normalized text
    pub text: String,
}

impl Element {
    /// Create an element, normalizing its text.
    ///
    /// Text is NFC-normalized. Contact text keeps one trimmed line per row
    /// and drops blank rows; all other text collapses whitespace runs to
    /// single spaces.
    pub fn new(kind: ElementKind, text: &str) -> Self {
        let text: String = replace_controls(text).nfc().collect();
        let text = match kind {
            ElementKind::Contact => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            _ => text.split_whitespace().collect::<Vec<_>>().join(" "),
        };
        Self { kind, text }
    }
}

/// Elements a renderer is expected to emit for a document.
pub fn expected_elements(doc: &ResumeDocument, options: &RenderOptions) -> Result<Vec<Element>> {
    let mut collector = ElementCollector::default();
    walk(doc, options, &mut collector)?;
    Ok(collector.elements)
}

/// Detect the format of rendered bytes and read their elements.
pub fn inspect_bytes(data: &[u8]) -> Result<(OutputFormat, Vec<Element>)> {
    let format = detect_format_from_bytes(data)?.format;
    let elements: Vec<Element> = match format {
        #[cfg(feature = "pdf")]
        OutputFormat::Pdf => pdf_elements(data)?,
        #[cfg(feature = "docx")]
        OutputFormat::Docx => docx_elements(data)?,
        #[allow(unreachable_patterns)]
        other => return Err(Error::BackendUnavailable(other)),
    };
    log::debug!("inspected {} element(s) from {}", elements.len(), format);
    Ok((format, elements))
}

#[derive(Default)]
struct ElementCollector {
    elements: Vec<Element>,
}

impl DocumentVisitor for ElementCollector {
    fn visit_title(&mut self, title: &str) -> Result<()> {
        self.elements.push(Element::new(ElementKind::Title, title));
        Ok(())
    }

    fn visit_contact(&mut self, contact: &ContactBlock<'_>) -> Result<()> {
        let text = contact.rows().join("\n");
        self.elements.push(Element::new(ElementKind::Contact, &text));
        Ok(())
    }

    fn visit_heading(&mut self, heading: &str) -> Result<()> {
        self.elements.push(Element::new(ElementKind::Heading, heading));
        Ok(())
    }

    fn visit_paragraph(&mut self, text: &str) -> Result<()> {
        self.elements.push(Element::new(ElementKind::Paragraph, text));
        Ok(())
    }
}
