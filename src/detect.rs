//! Output format detection for rendered documents.

use crate::error::{Error, Result};
use crate::render::OutputFormat;
use std::fs;
use std::path::Path;

/// Detected document format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedFormat {
    /// Document format
    pub format: OutputFormat,
    /// Header version (e.g., "1.5"); PDF only
    pub version: Option<String>,
}

impl std::fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.version {
            Some(ref version) => write!(f, "{} {}", self.format, version),
            None => write!(f, "{}", self.format),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// ZIP local file header signature.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Main part every word-processing package carries.
const DOCX_MAIN_PART: &[u8] = b"word/document.xml";

/// Detect the format of a file on disk.
///
/// # Example
/// ```no_run
/// use resumedoc::detect::detect_format_from_path;
///
/// let detected = detect_format_from_path("resume.pdf").unwrap();
/// println!("{}", detected);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DetectedFormat> {
    let data = fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect the format of in-memory document bytes.
///
/// # Returns
/// * `Ok(DetectedFormat)` for a PDF header or a ZIP package holding `word/document.xml`
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DetectedFormat> {
    if data.starts_with(PDF_MAGIC) {
        if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
            return Err(Error::UnknownFormat);
        }
        let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
        let version = String::from_utf8_lossy(version_bytes).to_string();
        if !is_valid_version(&version) {
            return Err(Error::UnknownFormat);
        }
        return Ok(DetectedFormat {
            format: OutputFormat::Pdf,
            version: Some(version),
        });
    }

    if is_docx_bytes(data) {
        return Ok(DetectedFormat {
            format: OutputFormat::Docx,
            version: None,
        });
    }

    Err(Error::UnknownFormat)
}

/// Detect only the output format of document bytes.
pub fn detect_format(data: &[u8]) -> Result<OutputFormat> {
    detect_format_from_bytes(data).map(|detected| detected.format)
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    if version.len() != 3 {
        return false;
    }

    let chars: Vec<char> = version.chars().collect();
    chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(
        detect_format_from_bytes(data),
        Ok(DetectedFormat {
            format: OutputFormat::Pdf,
            ..
        })
    )
}

/// Check if bytes are a ZIP package containing a word-processing main part.
///
/// Entry names are stored uncompressed in ZIP headers, so a byte scan is
/// enough without opening the archive.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
        && data
            .windows(DOCX_MAIN_PART.len())
            .any(|window| window == DOCX_MAIN_PART)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let detected = detect_format_from_bytes(data).unwrap();
        assert_eq!(detected.format, OutputFormat::Pdf);
        assert_eq!(detected.version.as_deref(), Some("1.7"));
        assert_eq!(detected.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_detect_docx_package() {
        let mut data = b"PK\x03\x04\x14\x00\x00\x00".to_vec();
        data.extend_from_slice(b"word/document.xml");
        let detected = detect_format_from_bytes(&data).unwrap();
        assert_eq!(detected.format, OutputFormat::Docx);
        assert_eq!(detected.to_string(), "DOCX");
    }

    #[test]
    fn test_plain_zip_is_not_docx() {
        let data = b"PK\x03\x04\x14\x00\x00\x00readme.txt";
        assert!(!is_docx_bytes(data));
        assert!(matches!(
            detect_format_from_bytes(data),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_invalid_format() {
        let data = b"<!DOCTYPE html>";
        let result = detect_format_from_bytes(data);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            detect_format_from_bytes(b"%PDF-1"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("10.0"));
        assert!(!is_valid_version("abc"));
    }
}
