//! JSON form of the document model.
//!
//! The model is the hand-off point between parsing and rendering, so it can
//! be dumped, edited and loaded again before a render.

use crate::error::Result;
use crate::model::ResumeDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Indented, one field per line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Serialize a document model.
pub fn to_json(doc: &ResumeDocument, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc)?,
        JsonFormat::Compact => serde_json::to_string(doc)?,
    };
    Ok(json)
}

/// Load a document model from JSON.
///
/// Paragraphs are trimmed and blank ones dropped, so a hand-edited model
/// renders the same way a parsed one does.
pub fn from_json(json: &str) -> Result<ResumeDocument> {
    let mut doc: ResumeDocument = serde_json::from_str(json)?;
    for section in &mut doc.sections {
        section.paragraphs = section
            .paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
    }
    Ok(doc)
}
