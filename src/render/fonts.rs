//! Embedded DejaVu Sans faces for the page renderer.
//!
//! Text is written as two-byte glyph ids (`Identity-H`), so any character
//! the face carries a glyph for survives into the PDF. Each [`Font`] records
//! the glyphs it hands out; the page renderer turns that record into the
//! `W` width array and the `ToUnicode` CMap that makes the text extractable.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use ttf_parser::{Face, GlyphId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

static REGULAR_PROGRAM: &[u8] = include_bytes!("../../fonts/DejaVuSans.ttf");
static BOLD_PROGRAM: &[u8] = include_bytes!("../../fonts/DejaVuSans-Bold.ttf");

/// Glyph drawn for characters the face does not cover.
const NOTDEF: GlyphId = GlyphId(0);

/// Entries per `beginbfchar` block; the CMap format caps blocks at 100.
const BFCHAR_BLOCK: usize = 100;

/// Font face used by the page renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    /// DejaVu Sans
    Regular,
    /// DejaVu Sans Bold
    Bold,
}

impl FontFace {
    /// Resource name in the page's font dictionary.
    pub fn resource_name(&self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"F1",
            FontFace::Bold => b"F2",
        }
    }

    /// PostScript base font name.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "DejaVuSans",
            FontFace::Bold => "DejaVuSans-Bold",
        }
    }

    /// TrueType program embedded as `FontFile2`.
    pub fn program(&self) -> &'static [u8] {
        match self {
            FontFace::Regular => REGULAR_PROGRAM,
            FontFace::Bold => BOLD_PROGRAM,
        }
    }

    /// Dominant vertical stem width for the font descriptor.
    pub fn stem_v(&self) -> i64 {
        match self {
            FontFace::Regular => 80,
            FontFace::Bold => 140,
        }
    }
}

/// Descriptor metrics in glyph space (thousandths of the font size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Typographic ascender
    pub ascent: i64,
    /// Typographic descender (negative)
    pub descent: i64,
    /// Height of flat capitals
    pub cap_height: i64,
    /// Union of all glyph boxes: `[x_min, y_min, x_max, y_max]`
    pub bbox: [i64; 4],
}

/// Glyph-id text and the number of characters drawn as `.notdef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    /// Big-endian two-byte glyph ids
    pub bytes: Vec<u8>,
    /// Characters the face had no glyph for
    pub replaced: usize,
    /// Whether the `ToUnicode` map decodes `bytes` back to the input
    pub exact: bool,
}

/// A parsed face plus the glyphs used so far in one render.
pub struct Font {
    kind: FontFace,
    face: Face<'static>,
    scale: f32,
    used: BTreeMap<u16, char>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("kind", &self.kind)
            .field("used", &self.used.len())
            .finish()
    }
}

impl Font {
    /// Parse the embedded program for a face.
    pub fn load(kind: FontFace) -> Result<Self> {
        let face = Face::parse(kind.program(), 0).map_err(|e| {
            Error::Pdf(format!("embedded font {} unreadable: {}", kind.base_font(), e))
        })?;
        let scale = 1000.0 / f32::from(face.units_per_em().max(1));

        Ok(Self {
            kind,
            face,
            scale,
            used: BTreeMap::new(),
        })
    }

    /// Face this font was loaded from.
    pub fn kind(&self) -> FontFace {
        self.kind
    }

    /// Whether any glyph has been encoded.
    pub fn is_used(&self) -> bool {
        !self.used.is_empty()
    }

    fn glyph(&self, c: char) -> Option<GlyphId> {
        let c = if c.is_control() { ' ' } else { c };
        self.face.glyph_index(c).filter(|g| *g != NOTDEF)
    }

    fn advance(&self, glyph: GlyphId) -> u16 {
        let units = self.face.glyph_hor_advance(glyph).unwrap_or(0);
        (f32::from(units) * self.scale).round() as u16
    }

    /// Advance width of a character in thousandths of the font size.
    pub fn char_width(&self, c: char) -> u16 {
        self.advance(self.glyph(c).unwrap_or(NOTDEF))
    }

    /// Width of a string in points at the given size.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.nfc().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size / 1000.0
    }

    /// Encode text as glyph ids after NFC normalization.
    ///
    /// Control characters become spaces. Characters without a glyph are
    /// drawn as `.notdef` and counted in [`EncodedText::replaced`]. A glyph
    /// shared by two characters maps back to whichever was encoded first,
    /// which also clears [`EncodedText::exact`].
    pub fn encode(&mut self, text: &str) -> EncodedText {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        let mut replaced = 0;
        let mut exact = true;

        for c in text.nfc() {
            let c = if c.is_control() { ' ' } else { c };
            let glyph = match self.glyph(c) {
                Some(glyph) => {
                    if *self.used.entry(glyph.0).or_insert(c) != c {
                        exact = false;
                    }
                    glyph
                }
                None => {
                    replaced += 1;
                    exact = false;
                    NOTDEF
                }
            };
            bytes.extend_from_slice(&glyph.0.to_be_bytes());
        }

        EncodedText {
            bytes,
            replaced,
            exact,
        }
    }

    /// Width of `.notdef`, used as the CID font's default width.
    pub fn default_width(&self) -> u16 {
        self.advance(NOTDEF)
    }

    /// Used glyph ids with their widths, in glyph order.
    pub fn widths(&self) -> Vec<(u16, u16)> {
        self.used
            .keys()
            .map(|&gid| (gid, self.advance(GlyphId(gid))))
            .collect()
    }

    /// Descriptor metrics for the face.
    pub fn metrics(&self) -> FontMetrics {
        let scaled = |units: i16| (f32::from(units) * self.scale).round() as i64;
        let bbox = self.face.global_bounding_box();
        let ascent = scaled(self.face.ascender());

        FontMetrics {
            ascent,
            descent: scaled(self.face.descender()),
            cap_height: self.face.capital_height().map(scaled).unwrap_or(ascent),
            bbox: [
                scaled(bbox.x_min),
                scaled(bbox.y_min),
                scaled(bbox.x_max),
                scaled(bbox.y_max),
            ],
        }
    }

    /// `ToUnicode` CMap mapping every used glyph back to its character.
    pub fn to_unicode_cmap(&self) -> Vec<u8> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );

        let entries: Vec<(&u16, &char)> = self.used.iter().collect();
        for block in entries.chunks(BFCHAR_BLOCK) {
            let _ = writeln!(cmap, "{} beginbfchar", block.len());
            for (gid, c) in block {
                let mut units = [0u16; 2];
                let target: String = c
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|u| format!("{:04X}", u))
                    .collect();
                let _ = writeln!(cmap, "<{:04X}> <{}>", gid, target);
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMap defineresource pop\n\
             end\n\
             end\n",
        );
        cmap.into_bytes()
    }
}

/// Regular and bold fonts for one render call.
#[derive(Debug)]
pub struct FontSet {
    regular: Font,
    bold: Font,
}

impl FontSet {
    /// Load both faces.
    pub fn load() -> Result<Self> {
        Ok(Self {
            regular: Font::load(FontFace::Regular)?,
            bold: Font::load(FontFace::Bold)?,
        })
    }

    /// Font for a face.
    pub fn get(&self, face: FontFace) -> &Font {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }

    /// Mutable font for a face, for encoding.
    pub fn get_mut(&mut self, face: FontFace) -> &mut Font {
        match face {
            FontFace::Regular => &mut self.regular,
            FontFace::Bold => &mut self.bold,
        }
    }

    /// Fonts that encoded at least one glyph.
    pub fn used(&self) -> impl Iterator<Item = &Font> {
        [&self.regular, &self.bold].into_iter().filter(|f| f.is_used())
    }
}

/// Greedy word wrap to a maximum line width.
///
/// Whitespace runs collapse to single spaces. A word wider than the limit
/// gets a line of its own and is not broken.
pub fn wrap_text(text: &str, font: &Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let space = font.measure(" ", size);

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate_width = font.measure(&current, size) + space + font.measure(word, size);
        if candidate_width <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
