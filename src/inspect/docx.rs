//! Paragraph-style reader for rendered DOCX packages.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::render::flow::styles;

use super::{Element, ElementKind};

const MAIN_PART: &str = "word/document.xml";

/// Read the elements of a DOCX produced by the flow renderer.
///
/// Paragraphs without text (spacers) are skipped.
pub fn docx_elements(data: &[u8]) -> Result<Vec<Element>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| Error::Inspect(format!("failed to open DOCX package: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(MAIN_PART)
        .map_err(|e| Error::Inspect(format!("missing {}: {}", MAIN_PART, e)))?
        .read_to_string(&mut xml)?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<Vec<Element>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut elements = Vec::new();
    let mut style: Option<String> = None;
    let mut text = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => {
                    in_paragraph = true;
                    style = None;
                    text.clear();
                }
                b"t" => in_text = true,
                b"pStyle" => style = style_value(&e),
                b"br" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"pStyle" => style = style_value(&e),
                b"br" if in_paragraph => text.push('\n'),
                b"tab" if in_paragraph => text.push('\t'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| Error::Inspect(format!("invalid text run: {}", err)))?;
                text.push_str(&unescaped);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" if in_paragraph => {
                    in_paragraph = false;
                    if !text.trim().is_empty() {
                        let kind = style_kind(style.as_deref());
                        elements.push(Element::new(kind, &text));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Inspect(format!(
                    "malformed document.xml at {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(elements)
}

fn style_value(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"val")
        .and_then(|attr| attr.unescape_value().ok())
        .map(|v| v.into_owned())
}

fn style_kind(style: Option<&str>) -> ElementKind {
    match style {
        Some(styles::TITLE) => ElementKind::Title,
        Some(styles::CONTACT) => ElementKind::Contact,
        Some(s) if s.starts_with("Heading") => ElementKind::Heading,
        _ => ElementKind::Paragraph,
    }
}
