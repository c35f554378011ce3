//! # resumedoc
//!
//! Résumé text segmentation and document generation for Rust.
//!
//! Plain résumé text is split into sections by recognizing header lines,
//! normalized into one document model, and rendered to PDF or DOCX. Both
//! renderers walk the model in the same order, so the two outputs carry the
//! same title, contact block, headings and paragraphs.
//!
//! ## Quick Start
//!
//! ```
//! use resumedoc::{generate_docx, generate_pdf};
//!
//! fn main() -> resumedoc::Result<()> {
//!     let text = "Jane Doe\njane@x.com\n555-1234\nEXPERIENCE\nDid stuff";
//!
//!     let pdf = generate_pdf(text, "jane.txt")?;
//!     let docx = generate_docx(text, "jane.txt")?;
//!
//!     assert_eq!(pdf.filename, "jane.pdf");
//!     assert_eq!(docx.filename, "jane.docx");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Header recognition**: keyword table with a length guard
//! - **One model, two layouts**: paginated PDF (`pdf` feature, lopdf) and flow
//!   DOCX (`docx` feature, docx-rs)
//! - **Read-back**: recover the element list from rendered bytes to compare outputs
//! - **Parallel batches**: Rayon over independent inputs

pub mod convert;
pub mod detect;
pub mod error;
pub mod inspect;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    convert_batch, generate_docx, generate_pdf, BatchInput, ConvertOptions, GeneratedDocument,
    ResumeConverter,
};
pub use detect::{detect_format, detect_format_from_bytes, detect_format_from_path, DetectedFormat};
pub use error::{Error, Result};
pub use inspect::{expected_elements, Element, ElementKind};
pub use model::{Metadata, RawSection, ResumeDocument, Section, SectionMap};
pub use parser::{HeaderGate, ParseOptions, ResumeParser, SectionClassifier};
pub use render::{
    DocumentRenderer, JsonFormat, OutputFormat, PageSize, RenderOptions, RenderStats, Renderer,
};

/// Parse résumé text into the document model.
///
/// # Example
///
/// ```
/// use resumedoc::parse_text;
///
/// let doc = parse_text("Jane Doe\njane@x.com\nEXPERIENCE\nDid stuff");
/// assert_eq!(doc.title.as_deref(), Some("Jane Doe"));
/// assert_eq!(doc.sections[0].heading, "Experience");
/// ```
pub fn parse_text(text: &str) -> ResumeDocument {
    ResumeParser::new().parse(text)
}

/// Parse résumé text with custom options.
///
/// # Example
///
/// ```
/// use resumedoc::{parse_text_with_options, ParseOptions};
///
/// let options = ParseOptions::new().always_split();
/// let doc = parse_text_with_options("EXPERIENCE\nDid stuff", options).unwrap();
/// assert_eq!(doc.sections.len(), 1);
/// ```
pub fn parse_text_with_options(text: &str, options: ParseOptions) -> Result<ResumeDocument> {
    Ok(ResumeParser::with_options(options)?.parse(text))
}

/// Serialize the model of a text to JSON.
pub fn to_json(text: &str, format: JsonFormat) -> Result<String> {
    render::to_json(&parse_text(text), format)
}

/// Plain-text preview of a text, in rendering order.
pub fn to_text(text: &str) -> Result<String> {
    render::to_text(&parse_text(text), &RenderOptions::default())
}

/// Library version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_parse_text_worked_example() {
        let doc = parse_text("Jane Doe\njane@x.com\n555-1234\nEXPERIENCE\nDid stuff");
        assert_eq!(doc.title.as_deref(), Some("Jane Doe"));
        assert_eq!(doc.contact.as_deref(), Some("jane@x.com\n555-1234"));
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, "Experience");
        assert_eq!(doc.sections[0].paragraphs, vec!["Did stuff"]);
    }

    #[test]
    fn test_parse_text_with_options_always_split() {
        let default = parse_text("EXPERIENCE\nDid stuff");
        assert!(default.sections.is_empty());
        assert_eq!(default.title.as_deref(), Some("EXPERIENCE"));

        let doc = parse_text_with_options("EXPERIENCE\nDid stuff", ParseOptions::new().always_split())
            .unwrap();
        assert!(doc.title.is_none());
        assert_eq!(doc.sections[0].paragraphs, vec!["Did stuff"]);
    }

    #[test]
    fn test_to_json_and_text() {
        let text = "Jane\nSKILLS\nRust";
        let json = to_json(text, JsonFormat::Compact).unwrap();
        assert!(json.contains("\"heading\":\"Skills\""));

        let preview = to_text(text).unwrap();
        assert_eq!(preview, "Jane\n\nSKILLS\n\nRust");
    }
}
