//! Text-to-document conversion: parse, build the model, render.
//!
//! [`generate_pdf`] and [`generate_docx`] are the two entry points; both take
//! the same `(text, filename)` input. A failure anywhere in the pipeline is
//! logged and surfaced as [`Error::GenerationFailed`], except a missing
//! backend, which is reported as [`Error::BackendUnavailable`] before any
//! parsing happens.
//!
//! # Example
//!
//! ```
//! use resumedoc::convert::{generate_pdf, ResumeConverter};
//! use resumedoc::OutputFormat;
//!
//! fn main() -> resumedoc::Result<()> {
//!     let text = "Jane Doe\njane@x.com\nEXPERIENCE\nDid stuff";
//!
//!     let pdf = generate_pdf(text, "jane.txt")?;
//!     assert_eq!(pdf.filename, "jane.pdf");
//!
//!     let docx = ResumeConverter::new().convert(text, "jane", OutputFormat::Docx)?;
//!     assert_eq!(docx.mime_type, OutputFormat::Docx.mime_type());
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Metadata, ResumeDocument};
use crate::parser::{ParseOptions, ResumeParser};
use crate::render::{DocumentRenderer, OutputFormat, RenderOptions, RenderStats, Renderer};

/// Fallback file stem when the caller's filename has none.
pub const DEFAULT_STEM: &str = "resume";

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Segmentation options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }
}

/// A rendered document ready to be written or served.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Encoded document
    pub bytes: Vec<u8>,

    /// Suggested filename, extension matching `format`
    pub filename: String,

    /// Output format
    pub format: OutputFormat,

    /// MIME type of `bytes`
    pub mime_type: &'static str,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl GeneratedDocument {
    /// Get the encoded length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if no bytes were produced.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One input of a batch conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    /// Résumé text
    pub text: String,
    /// Suggested filename
    pub filename: String,
}

impl BatchInput {
    /// Create a batch input.
    pub fn new(text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filename: filename.into(),
        }
    }
}

/// Converts résumé text to PDF or DOCX with fixed options.
#[derive(Debug, Clone, Default)]
pub struct ResumeConverter {
    parser: ResumeParser,
    render: RenderOptions,
}

impl ResumeConverter {
    /// Create a converter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter from conversion options.
    pub fn with_options(options: ConvertOptions) -> Result<Self> {
        Ok(Self {
            parser: ResumeParser::with_options(options.parse)?,
            render: options.render,
        })
    }

    /// Replace the parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Result<Self> {
        self.parser = ResumeParser::with_options(options)?;
        Ok(self)
    }

    /// Replace the rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Get the parsing options.
    pub fn parse_options(&self) -> &ParseOptions {
        self.parser.options()
    }

    /// Get the rendering options.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Parse text into the document model without rendering.
    pub fn build_model(&self, text: &str, filename: &str) -> ResumeDocument {
        let metadata = Metadata {
            source_filename: non_empty(filename),
            generated_at: self.render.generated_at,
            line_count: 0,
        };
        self.parser.parse_with_metadata(text, metadata)
    }

    /// Convert text to the requested format.
    pub fn convert(
        &self,
        text: &str,
        filename: &str,
        format: OutputFormat,
    ) -> Result<GeneratedDocument> {
        let renderer = available_renderer(format)?;
        let doc = self.build_model(text, filename);
        self.render_with(&renderer, &doc, filename)
            .map_err(|err| generation_failure(format, filename, err))
    }

    /// Render an already built model, e.g. one loaded with
    /// [`render::from_json`](crate::render::from_json).
    pub fn render_model(
        &self,
        doc: &ResumeDocument,
        filename: &str,
        format: OutputFormat,
    ) -> Result<GeneratedDocument> {
        let renderer = available_renderer(format)?;
        self.render_with(&renderer, doc, filename)
            .map_err(|err| generation_failure(format, filename, err))
    }

    /// Convert text to PDF.
    pub fn pdf(&self, text: &str, filename: &str) -> Result<GeneratedDocument> {
        self.convert(text, filename, OutputFormat::Pdf)
    }

    /// Convert text to DOCX.
    pub fn docx(&self, text: &str, filename: &str) -> Result<GeneratedDocument> {
        self.convert(text, filename, OutputFormat::Docx)
    }

    /// Convert many inputs in parallel. Results keep input order.
    pub fn convert_batch(
        &self,
        inputs: &[BatchInput],
        format: OutputFormat,
    ) -> Vec<Result<GeneratedDocument>> {
        inputs
            .par_iter()
            .map(|input| self.convert(&input.text, &input.filename, format))
            .collect()
    }

    fn render_with(
        &self,
        renderer: &Renderer,
        doc: &ResumeDocument,
        filename: &str,
    ) -> Result<GeneratedDocument> {
        let result = renderer.render(doc, &self.render)?;
        let format = renderer.format();

        log::debug!(
            "rendered {} with {}: {} section(s), {} bytes",
            format,
            renderer.name(),
            result.stats.section_count,
            result.len()
        );

        Ok(GeneratedDocument {
            filename: output_filename(filename, format),
            format,
            mime_type: format.mime_type(),
            stats: result.stats,
            bytes: result.bytes,
        })
    }
}

fn available_renderer(format: OutputFormat) -> Result<Renderer> {
    let renderer = Renderer::for_format(format);
    if renderer.is_available() {
        Ok(renderer)
    } else {
        Err(Error::BackendUnavailable(format))
    }
}

fn generation_failure(format: OutputFormat, filename: &str, err: Error) -> Error {
    match err {
        Error::BackendUnavailable(_) | Error::GenerationFailed(_) => err,
        other => {
            log::error!("{} generation failed for {:?}: {}", format, filename, other);
            Error::GenerationFailed(other.to_string())
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Output filename for a caller-supplied name: directory and extension are
/// dropped and the format's extension is appended.
///
/// ```
/// use resumedoc::convert::output_filename;
/// use resumedoc::OutputFormat;
///
/// assert_eq!(output_filename("cv/jane.txt", OutputFormat::Pdf), "jane.pdf");
/// assert_eq!(output_filename("", OutputFormat::Docx), "resume.docx");
/// ```
pub fn output_filename(filename: &str, format: OutputFormat) -> String {
    let stem = Path::new(filename.trim())
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_STEM);
    format!("{}.{}", stem, format.extension())
}

/// Generate a PDF from résumé text with default options.
pub fn generate_pdf(text: &str, filename: &str) -> Result<GeneratedDocument> {
    ResumeConverter::new().pdf(text, filename)
}

/// Generate a DOCX from résumé text with default options.
pub fn generate_docx(text: &str, filename: &str) -> Result<GeneratedDocument> {
    ResumeConverter::new().docx(text, filename)
}

/// Convert many inputs in parallel with default options.
pub fn convert_batch(inputs: &[BatchInput], format: OutputFormat) -> Vec<Result<GeneratedDocument>> {
    ResumeConverter::new().convert_batch(inputs, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::HeaderGate;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_parse_options(ParseOptions::new().always_split())
            .with_render_options(RenderOptions::new().with_margin_inches(1.0));

        assert_eq!(options.parse.header_gate, HeaderGate::Always);
        assert_eq!(options.render.margin_pt, 72.0);
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(output_filename("jane.txt", OutputFormat::Pdf), "jane.pdf");
        assert_eq!(output_filename("jane", OutputFormat::Docx), "jane.docx");
        assert_eq!(output_filename("a/b/jane.pdf", OutputFormat::Docx), "jane.docx");
        assert_eq!(output_filename("   ", OutputFormat::Pdf), "resume.pdf");
    }

    #[test]
    fn test_build_model_records_filename() {
        let doc = ResumeConverter::new().build_model("Jane\nSKILLS\nRust", "jane.txt");
        assert_eq!(doc.metadata.source_filename.as_deref(), Some("jane.txt"));
        assert_eq!(doc.metadata.line_count, 3);
        assert_eq!(doc.sections.len(), 1);
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_generate_pdf() {
        let doc = generate_pdf("Jane Doe\njane@x.com\nEXPERIENCE\nDid stuff", "jane").unwrap();
        assert_eq!(doc.format, OutputFormat::Pdf);
        assert_eq!(doc.filename, "jane.pdf");
        assert_eq!(doc.mime_type, "application/pdf");
        assert_eq!(doc.stats.section_count, 1);
        assert_eq!(doc.stats.byte_len, doc.len());
    }

    #[cfg(feature = "docx")]
    #[test]
    fn test_generate_docx_empty_input() {
        let doc = generate_docx("", "").unwrap();
        assert_eq!(doc.filename, "resume.docx");
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_render_errors_are_wrapped() {
        let err = generation_failure(OutputFormat::Pdf, "x", Error::Pdf("bad xref".into()));
        match err {
            Error::GenerationFailed(cause) => assert!(cause.contains("bad xref")),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = generation_failure(
            OutputFormat::Docx,
            "x",
            Error::BackendUnavailable(OutputFormat::Docx),
        );
        assert!(err.is_backend_unavailable());
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_render_model_matches_convert() {
        let text = "Jane\nSKILLS\nRust";
        let converter = ResumeConverter::new();
        let doc = converter.build_model(text, "jane");

        let direct = converter.pdf(text, "jane").unwrap();
        let from_model = converter
            .render_model(&doc, "jane", OutputFormat::Pdf)
            .unwrap();
        assert_eq!(from_model.filename, direct.filename);
        assert_eq!(from_model.stats.line_count, direct.stats.line_count);
    }

    #[cfg(all(feature = "pdf", feature = "docx"))]
    #[test]
    fn test_convert_batch_keeps_order() {
        let inputs: Vec<BatchInput> = (0..8)
            .map(|i| BatchInput::new(format!("Person {}\nSKILLS\nRust", i), format!("p{}", i)))
            .collect();

        let results = convert_batch(&inputs, OutputFormat::Docx);
        assert_eq!(results.len(), 8);
        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result.unwrap().filename, format!("p{}.docx", i));
        }
    }
}
