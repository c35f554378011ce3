//! Plain text preview of the document model.

use std::borrow::Cow;

use crate::error::Result;
use crate::model::ResumeDocument;

use super::visitor::{walk, ContactBlock, DocumentVisitor};
use super::RenderOptions;

/// Render a document as plain text, in the same order as the PDF and DOCX output.
pub fn to_text(doc: &ResumeDocument, options: &RenderOptions) -> Result<String> {
    let mut preview = TextPreview::default();
    walk(doc, options, &mut preview)?;
    Ok(preview.blocks.join("\n\n"))
}

/// Replace control characters other than tab and newline with spaces.
///
/// XML 1.0 forbids most C0 controls, and the PDF fonts carry no glyphs for
/// them, so both renderers and the element read-back see the same text.
pub fn replace_controls(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_replaced_control) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if is_replaced_control(c) { ' ' } else { c })
            .collect(),
    )
}

fn is_replaced_control(c: char) -> bool {
    c.is_control() && c != '\t' && c != '\n'
}

#[derive(Default)]
struct TextPreview {
    blocks: Vec<String>,
}

impl DocumentVisitor for TextPreview {
    fn visit_title(&mut self, title: &str) -> Result<()> {
        self.blocks.push(title.to_string());
        Ok(())
    }

    fn visit_contact(&mut self, contact: &ContactBlock<'_>) -> Result<()> {
        self.blocks.push(contact.rows().join("\n"));
        Ok(())
    }

    fn visit_heading(&mut self, heading: &str) -> Result<()> {
        self.blocks.push(heading.to_uppercase());
        Ok(())
    }

    fn visit_paragraph(&mut self, text: &str) -> Result<()> {
        self.blocks.push(text.to_string());
        Ok(())
    }
}
