//! Rendering module for producing PDF and DOCX documents from the model.

#[cfg(feature = "pdf")]
pub mod fonts;
#[cfg(feature = "docx")]
pub mod flow;
mod json;
mod options;
#[cfg(feature = "pdf")]
pub mod page;
mod result;
mod text;
pub mod visitor;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ResumeDocument;

#[cfg(feature = "docx")]
pub use flow::FlowRenderer;
pub use json::{from_json, to_json, JsonFormat};
pub use options::{points_to_twips, PageSize, RenderOptions, POINTS_PER_INCH};
#[cfg(feature = "pdf")]
pub use page::PageRenderer;
pub use result::{RenderResult, RenderStats};
pub use text::{replace_controls, to_text};
pub use visitor::{walk, ContactBlock, DocumentVisitor};

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-layout PDF
    Pdf,
    /// Office Open XML word-processing document
    Docx,
}

impl OutputFormat {
    /// All formats, in preference order.
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Pdf, OutputFormat::Docx];

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }

    /// MIME type for the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Look up a format by file extension (case-insensitive, dot optional).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(OutputFormat::Pdf),
            "docx" => Some(OutputFormat::Docx),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pdf => write!(f, "PDF"),
            OutputFormat::Docx => write!(f, "DOCX"),
        }
    }
}

/// Renders a document model to encoded bytes.
pub trait DocumentRenderer: Send + Sync {
    /// Format produced by this renderer.
    fn format(&self) -> OutputFormat;

    /// Backend name, for logging.
    fn name(&self) -> &str;

    /// Render the document.
    fn render(&self, doc: &ResumeDocument, options: &RenderOptions) -> Result<RenderResult>;
}

/// Renderer capability for one output format.
///
/// Backends are Cargo features; a format whose feature is disabled resolves
/// to [`Renderer::Unavailable`], which fails every render with
/// [`Error::BackendUnavailable`].
#[derive(Debug, Clone, Copy)]
pub enum Renderer {
    /// lopdf page layout
    #[cfg(feature = "pdf")]
    Page(PageRenderer),
    /// docx-rs flow layout
    #[cfg(feature = "docx")]
    Flow(FlowRenderer),
    /// No backend compiled in for this format
    Unavailable(OutputFormat),
}

impl Renderer {
    /// Select the renderer for a format.
    pub fn for_format(format: OutputFormat) -> Self {
        match format {
            #[cfg(feature = "pdf")]
            OutputFormat::Pdf => Renderer::Page(PageRenderer::new()),
            #[cfg(feature = "docx")]
            OutputFormat::Docx => Renderer::Flow(FlowRenderer::new()),
            #[allow(unreachable_patterns)]
            other => Renderer::Unavailable(other),
        }
    }

    /// Check if a backend is present.
    pub fn is_available(&self) -> bool {
        !matches!(self, Renderer::Unavailable(_))
    }
}

impl DocumentRenderer for Renderer {
    fn format(&self) -> OutputFormat {
        match self {
            #[cfg(feature = "pdf")]
            Renderer::Page(r) => r.format(),
            #[cfg(feature = "docx")]
            Renderer::Flow(r) => r.format(),
            Renderer::Unavailable(format) => *format,
        }
    }

    fn name(&self) -> &str {
        match self {
            #[cfg(feature = "pdf")]
            Renderer::Page(r) => r.name(),
            #[cfg(feature = "docx")]
            Renderer::Flow(r) => r.name(),
            Renderer::Unavailable(_) => "unavailable",
        }
    }

    fn render(&self, doc: &ResumeDocument, options: &RenderOptions) -> Result<RenderResult> {
        match self {
            #[cfg(feature = "pdf")]
            Renderer::Page(r) => r.render(doc, options),
            #[cfg(feature = "docx")]
            Renderer::Flow(r) => r.render(doc, options),
            Renderer::Unavailable(format) => Err(Error::BackendUnavailable(*format)),
        }
    }
}

/// Formats with a compiled-in backend.
pub fn available_formats() -> Vec<OutputFormat> {
    OutputFormat::ALL
        .into_iter()
        .filter(|f| Renderer::for_format(*f).is_available())
        .collect()
}

/// Render a document to PDF bytes.
pub fn to_pdf(doc: &ResumeDocument, options: &RenderOptions) -> Result<Vec<u8>> {
    Renderer::for_format(OutputFormat::Pdf)
        .render(doc, options)
        .map(RenderResult::into_bytes)
}

/// Render a document to DOCX bytes.
pub fn to_docx(doc: &ResumeDocument, options: &RenderOptions) -> Result<Vec<u8>> {
    Renderer::for_format(OutputFormat::Docx)
        .render(doc, options)
        .map(RenderResult::into_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_properties() {
        assert_eq!(OutputFormat::Pdf.to_string(), "PDF");
        assert_eq!(OutputFormat::Docx.extension(), "docx");
        assert_eq!(OutputFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(OutputFormat::from_extension(".PDF"), Some(OutputFormat::Pdf));
        assert_eq!(OutputFormat::from_extension("md"), None);
    }

    #[test]
    fn test_renderer_selection() {
        for format in OutputFormat::ALL {
            let renderer = Renderer::for_format(format);
            assert_eq!(renderer.format(), format);
        }
    }

    #[cfg(all(feature = "pdf", feature = "docx"))]
    #[test]
    fn test_all_formats_available() {
        assert_eq!(available_formats(), OutputFormat::ALL.to_vec());
        assert_eq!(Renderer::for_format(OutputFormat::Pdf).name(), "lopdf");
        assert_eq!(Renderer::for_format(OutputFormat::Docx).name(), "docx-rs");
    }

    #[test]
    fn test_unavailable_renderer_reports_format() {
        let renderer = Renderer::Unavailable(OutputFormat::Docx);
        assert!(!renderer.is_available());

        let err = renderer
            .render(&ResumeDocument::new(), &RenderOptions::default())
            .unwrap_err();
        assert!(err.is_backend_unavailable());
        assert_eq!(err.to_string(), "DOCX rendering backend is not available");
    }
}
