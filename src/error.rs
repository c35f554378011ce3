//! Error types for resumedoc library.

use std::io;
use thiserror::Error;

use crate::render::OutputFormat;

/// Result type alias for resumedoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or rendering a résumé document.
#[derive(Error, Debug)]
pub enum Error {
    /// The rendering backend for the requested format is not compiled in.
    #[error("{0} rendering backend is not available")]
    BackendUnavailable(OutputFormat),

    /// Top-level failure of a generation call, carrying the original cause.
    #[error("document generation failed: {0}")]
    GenerationFailed(String),

    /// Error producing the fixed-layout (PDF) output.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Error producing the flow (DOCX) output.
    #[error("DOCX error: {0}")]
    Docx(String),

    /// Error during rendering (layout, JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error reading a rendered document back.
    #[error("Inspection error: {0}")]
    Inspect(String),

    /// The bytes are neither a PDF nor a DOCX package.
    #[error("Unknown file format: not a PDF or DOCX document")]
    UnknownFormat,

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error reports a missing backend rather than a failed render.
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Error::BackendUnavailable(_))
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::BackendUnavailable(OutputFormat::Pdf);
        assert_eq!(err.to_string(), "PDF rendering backend is not available");

        let err = Error::GenerationFailed("layout exploded".to_string());
        assert_eq!(
            err.to_string(),
            "document generation failed: layout exploded"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_backend_unavailable());
    }

    #[test]
    fn test_backend_unavailable_predicate() {
        assert!(Error::BackendUnavailable(OutputFormat::Docx).is_backend_unavailable());
        assert!(!Error::UnknownFormat.is_backend_unavailable());
    }
}
