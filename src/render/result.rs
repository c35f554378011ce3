//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

use super::OutputFormat;

/// Result of rendering a document: encoded bytes plus statistics.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Encoded document bytes
    pub bytes: Vec<u8>,

    /// Format of `bytes`
    pub format: OutputFormat,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(bytes: Vec<u8>, format: OutputFormat, stats: RenderStats) -> Self {
        let stats = RenderStats {
            byte_len: bytes.len(),
            ..stats
        };
        Self {
            bytes,
            format,
            stats,
        }
    }

    /// Get the encoded length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if no bytes were produced.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the result, keeping only the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Statistics collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Pages laid out; `None` for flow formats
    pub page_count: Option<u32>,

    /// Number of sections rendered
    pub section_count: u32,

    /// Number of paragraphs rendered
    pub paragraph_count: u32,

    /// Lines of text placed (page formats only)
    pub line_count: u32,

    /// Characters replaced because the output font could not encode them
    pub replaced_chars: u32,

    /// Size of the encoded document
    pub byte_len: usize,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment section count.
    pub fn add_section(&mut self) {
        self.section_count += 1;
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.page_count = match (self.page_count, other.page_count) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };
        self.section_count += other.section_count;
        self.paragraph_count += other.paragraph_count;
        self.line_count += other.line_count;
        self.replaced_chars += other.replaced_chars;
        self.byte_len += other.byte_len;
    }
}
