//! Marked-content reader for rendered PDFs.

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};
use regex::Regex;

use crate::error::{Error, Result};
use crate::render::page::tags;

use super::{Element, ElementKind};

/// Glyph code to text, from a font's `ToUnicode` CMap.
type GlyphMap = HashMap<u16, String>;

/// Bound on `Parent` hops when looking up inherited page resources.
const MAX_TREE_DEPTH: usize = 32;

/// Read the tagged elements of a PDF produced by the page renderer.
///
/// Untagged content is ignored. A continuation sequence is appended to the
/// element opened before the page break, and a `Span` with `ActualText`
/// stands in for the glyphs it encloses.
pub fn pdf_elements(data: &[u8]) -> Result<Vec<Element>> {
    let pdf = LopdfDocument::load_mem(data)
        .map_err(|e| Error::Inspect(format!("failed to load PDF: {}", e)))?;

    let mut reader = MarkedContentReader::default();
    for (_, page_id) in pdf.get_pages() {
        reader.fonts = page_fonts(&pdf, page_id)?;
        let bytes = page_content(&pdf, page_id)?;
        let content = Content::decode(&bytes)
            .map_err(|e| Error::Inspect(format!("invalid content stream: {}", e)))?;
        for op in &content.operations {
            reader.apply(op);
        }
    }

    Ok(reader.finish())
}

fn page_content(pdf: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page = pdf
        .get_dictionary(page_id)
        .map_err(|e| Error::Inspect(e.to_string()))?;
    let contents = page
        .get(b"Contents")
        .map_err(|e| Error::Inspect(e.to_string()))?;

    match contents {
        Object::Reference(r) => match pdf.get_object(*r) {
            Ok(Object::Stream(s)) => stream_bytes(s),
            _ => Err(Error::Inspect("Invalid content stream".to_string())),
        },
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = pdf.get_object(*r) {
                        content.extend_from_slice(&stream_bytes(s)?);
                        content.push(b' ');
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::Inspect("Invalid content stream".to_string())),
    }
}

fn stream_bytes(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| Error::Inspect(format!("failed to decompress content: {}", e)))
    } else {
        Ok(stream.content.clone())
    }
}

fn resolve_dict<'a>(pdf: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(r) => pdf.get_dictionary(*r).ok(),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

/// Resources of a page, inherited from the page tree when not set directly.
fn page_resources(pdf: &LopdfDocument, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = pdf.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(resources) = node.get(b"Resources") {
            return resolve_dict(pdf, resources);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = pdf.get_dictionary(parent).ok()?;
    }
    None
}

/// Glyph maps for every page font that carries a `ToUnicode` stream.
fn page_fonts(pdf: &LopdfDocument, page_id: ObjectId) -> Result<HashMap<Vec<u8>, GlyphMap>> {
    let mut fonts = HashMap::new();
    let font_dict = page_resources(pdf, page_id)
        .and_then(|res| res.get(b"Font").ok())
        .and_then(|obj| resolve_dict(pdf, obj));
    let Some(font_dict) = font_dict else {
        return Ok(fonts);
    };

    for (name, obj) in font_dict.iter() {
        let Some(font) = resolve_dict(pdf, obj) else {
            continue;
        };
        let Ok(cmap_ref) = font.get(b"ToUnicode").and_then(Object::as_reference) else {
            continue;
        };
        if let Ok(Object::Stream(stream)) = pdf.get_object(cmap_ref) {
            fonts.insert(name.clone(), parse_to_unicode(&stream_bytes(stream)?));
        }
    }

    Ok(fonts)
}

/// Parse the `bfchar` entries of a two-byte `ToUnicode` CMap.
fn parse_to_unicode(data: &[u8]) -> GlyphMap {
    let text = String::from_utf8_lossy(data);
    let Ok(entry) = Regex::new(r"<([0-9A-Fa-f]{4})>\s*<([0-9A-Fa-f]+)>") else {
        return GlyphMap::new();
    };

    let mut map = GlyphMap::new();
    for block in text.split("beginbfchar").skip(1) {
        let body = block.split("endbfchar").next().unwrap_or("");
        for caps in entry.captures_iter(body) {
            let Ok(code) = u16::from_str_radix(&caps[1], 16) else {
                continue;
            };
            let units: Vec<u16> = caps[2]
                .as_bytes()
                .chunks(4)
                .filter_map(|c| std::str::from_utf8(c).ok())
                .filter_map(|c| u16::from_str_radix(c, 16).ok())
                .collect();
            map.insert(code, String::from_utf16_lossy(&units));
        }
    }
    map
}

/// Decode a PDF text string: UTF-16BE with BOM, otherwise byte per char.
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

fn tag_kind(tag: &[u8]) -> Option<ElementKind> {
    match std::str::from_utf8(tag).ok()? {
        tags::TITLE => Some(ElementKind::Title),
        tags::CONTACT => Some(ElementKind::Contact),
        tags::HEADING => Some(ElementKind::Heading),
        tags::PARAGRAPH => Some(ElementKind::Paragraph),
        _ => None,
    }
}

/// One open marked-content sequence.
enum Frame {
    /// Element block, by index into `blocks`
    Block(usize),
    /// `ActualText` span; enclosed glyphs are not decoded
    Replaced,
    /// Anything else
    Other,
}

#[derive(Default)]
struct MarkedContentReader {
    fonts: HashMap<Vec<u8>, GlyphMap>,
    font: Vec<u8>,
    blocks: Vec<(ElementKind, Vec<String>)>,
    stack: Vec<Frame>,
}

impl MarkedContentReader {
    fn apply(&mut self, op: &Operation) {
        match op.operator.as_str() {
            "BMC" | "BDC" => {
                let frame = self.open(op);
                self.stack.push(frame);
            }
            "EMC" => {
                self.stack.pop();
            }
            "Tf" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    self.font = name.clone();
                }
            }
            "Tj" | "'" | "\"" => {
                if let Some(Object::String(bytes, _)) = op.operands.last() {
                    let line = self.decode(bytes);
                    self.push_line(line);
                }
            }
            "TJ" => {
                if let Some(Object::Array(parts)) = op.operands.first() {
                    let line: String = parts
                        .iter()
                        .filter_map(|p| match p {
                            Object::String(bytes, _) => Some(self.decode(bytes)),
                            _ => None,
                        })
                        .collect();
                    self.push_line(line);
                }
            }
            _ => {}
        }
    }

    fn open(&mut self, op: &Operation) -> Frame {
        let tag = match op.operands.first() {
            Some(Object::Name(name)) => name.as_slice(),
            _ => return Frame::Other,
        };

        if tag == tags::SPAN.as_bytes() {
            let actual = match op.operands.get(1) {
                Some(Object::Dictionary(props)) => props.get(b"ActualText").ok(),
                _ => None,
            };
            if let Some(Object::String(bytes, _)) = actual {
                let line = decode_text_string(bytes);
                self.push_line(line);
                return Frame::Replaced;
            }
            return Frame::Other;
        }

        if tag == tags::CONTINUATION.as_bytes() {
            match self.blocks.len().checked_sub(1) {
                Some(index) => Frame::Block(index),
                None => Frame::Other,
            }
        } else if let Some(kind) = tag_kind(tag) {
            self.blocks.push((kind, Vec::new()));
            Frame::Block(self.blocks.len() - 1)
        } else {
            Frame::Other
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        match self.fonts.get(&self.font) {
            Some(map) => bytes
                .chunks(2)
                .map(|pair| {
                    let code = match *pair {
                        [hi, lo] => u16::from_be_bytes([hi, lo]),
                        [single] => u16::from(single),
                        _ => 0,
                    };
                    map.get(&code).map(String::as_str).unwrap_or("\u{FFFD}").to_string()
                })
                .collect(),
            None => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }

    /// Add a line to the innermost open block, unless a span replaces it.
    fn push_line(&mut self, line: String) {
        for frame in self.stack.iter().rev() {
            match frame {
                Frame::Replaced => return,
                Frame::Block(index) => {
                    if let Some((_, lines)) = self.blocks.get_mut(*index) {
                        lines.push(line);
                    }
                    return;
                }
                Frame::Other => {}
            }
        }
    }

    fn finish(self) -> Vec<Element> {
        self.blocks
            .into_iter()
            .map(|(kind, lines)| {
                let separator = if kind == ElementKind::Contact { "\n" } else { " " };
                Element::new(kind, &lines.join(separator))
            })
            .collect()
    }
}
