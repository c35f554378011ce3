//! Fixed-layout (PDF) rendering.
//!
//! Layout is a single top-to-bottom frame per page. Every block is wrapped
//! in a marked-content sequence (`BMC`/`EMC`) named after its role so the
//! structure can be read back with [`crate::inspect`]. A block that would
//! fit on a fresh page is moved there whole; a longer block is split and
//! its tail is tagged [`tags::CONTINUATION`]. A line the embedded font
//! cannot draw exactly is also wrapped in a `Span` carrying its
//! `ActualText`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::{Error, Result};
use crate::model::{Metadata, ResumeDocument};

use super::fonts::{wrap_text, Font, FontFace, FontSet};
use super::visitor::{walk, ContactBlock, DocumentVisitor};
use super::{DocumentRenderer, OutputFormat, RenderOptions, RenderResult, RenderStats};

/// Producer string written to the document information dictionary.
pub const PRODUCER: &str = concat!("resumedoc ", env!("CARGO_PKG_VERSION"));

/// Marked-content tags used in page content streams.
pub mod tags {
    /// Document title
    pub const TITLE: &str = "Title";
    /// Contact table
    pub const CONTACT: &str = "Contact";
    /// Section heading
    pub const HEADING: &str = "H1";
    /// Body paragraph
    pub const PARAGRAPH: &str = "P";
    /// Tail of a block split across a page break
    pub const CONTINUATION: &str = "Cont";
    /// Line whose extractable text is given by `ActualText`
    pub const SPAN: &str = "Span";
}

/// Padding above and below each contact row.
const CONTACT_PADDING: f32 = 4.0;

/// Gap between a heading and its first paragraph.
const HEADING_GAP: f32 = 4.0;

const EPSILON: f32 = 0.01;

/// PDF renderer built on lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRenderer;

impl PageRenderer {
    /// Create a new page renderer.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for PageRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    fn name(&self) -> &str {
        "lopdf"
    }

    fn render(&self, doc: &ResumeDocument, options: &RenderOptions) -> Result<RenderResult> {
        let mut layout = PageLayout::new(options, FontSet::load()?);
        walk(doc, options, &mut layout)?;
        let (pages, mut stats, fonts) = layout.finish();

        stats.page_count = Some(pages.len() as u32);
        if stats.replaced_chars > 0 {
            log::warn!(
                "{} character(s) missing from the embedded font drawn as .notdef",
                stats.replaced_chars
            );
        }

        let bytes = assemble(doc, options, pages, &fonts)?;
        log::debug!(
            "PDF laid out: {} page(s), {} line(s), {} bytes",
            stats.page_count.unwrap_or(0),
            stats.line_count,
            bytes.len()
        );

        Ok(RenderResult::new(bytes, OutputFormat::Pdf, stats))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
struct LineStyle {
    face: FontFace,
    size: f32,
    align: Align,
    padding: f32,
    /// Fill color and box width for table rows
    background: Option<([f32; 3], f32)>,
}

impl LineStyle {
    fn text(face: FontFace, size: f32, align: Align) -> Self {
        Self {
            face,
            size,
            align,
            padding: 0.0,
            background: None,
        }
    }
}

/// Cursor-based layout state for one render call.
struct PageLayout<'o> {
    options: &'o RenderOptions,
    fonts: FontSet,
    margin: f32,
    content_width: f32,
    top: f32,
    bottom: f32,
    cursor: f32,
    current: Vec<Operation>,
    finished: Vec<Vec<Operation>>,
    stats: RenderStats,
}

impl<'o> PageLayout<'o> {
    fn new(options: &'o RenderOptions, fonts: FontSet) -> Self {
        let (_, height) = options.page_dimensions();
        let margin = options.margin_pt;
        let top = height - margin;

        Self {
            options,
            fonts,
            margin,
            content_width: options.content_width(),
            top,
            bottom: margin.min(top),
            cursor: top,
            current: Vec::new(),
            finished: Vec::new(),
            stats: RenderStats::new(),
        }
    }

    fn finish(mut self) -> (Vec<Vec<Operation>>, RenderStats, FontSet) {
        self.finished.push(self.current);
        (self.finished, self.stats, self.fonts)
    }

    fn wrap(&self, text: &str, style: &LineStyle) -> Vec<String> {
        wrap_text(
            text,
            self.fonts.get(style.face),
            style.size,
            self.content_width,
        )
    }

    fn row_height(&self, style: &LineStyle) -> f32 {
        style.size * self.options.line_spacing + 2.0 * style.padding
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.bottom
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= self.top - EPSILON
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.cursor = self.top;
    }

    fn spacer(&mut self, height: f32) {
        if !self.at_page_top() {
            self.cursor -= height;
        }
    }

    /// Place a block of lines under one tag, paginating as needed.
    ///
    /// `keep_with_next` reserves room below the block so it is not left
    /// alone at the bottom of a page.
    fn block(&mut self, tag: &str, lines: &[String], style: LineStyle, keep_with_next: f32) {
        if lines.is_empty() {
            return;
        }

        let row = self.row_height(&style);
        let needed = row * lines.len() as f32 + keep_with_next;
        let page_room = self.top - self.bottom;
        if !self.at_page_top()
            && needed > self.remaining() + EPSILON
            && (needed <= page_room || row > self.remaining() + EPSILON)
        {
            self.new_page();
        }

        self.begin_marked(tag);
        for line in lines {
            if !self.at_page_top() && row > self.remaining() + EPSILON {
                self.end_marked();
                self.new_page();
                self.begin_marked(tags::CONTINUATION);
            }
            self.place_line(line, &style, row);
        }
        self.end_marked();
    }

    fn place_line(&mut self, text: &str, style: &LineStyle, row: f32) {
        let row_top = self.cursor;

        if let Some(([r, g, b], box_width)) = style.background {
            let x = self.margin + (self.content_width - box_width).max(0.0) / 2.0;
            self.current.extend([
                Operation::new("q", vec![]),
                Operation::new("rg", vec![r.into(), g.into(), b.into()]),
                Operation::new(
                    "re",
                    vec![x.into(), (row_top - row).into(), box_width.into(), row.into()],
                ),
                Operation::new("f", vec![]),
                Operation::new("Q", vec![]),
            ]);
        }

        let width = self.fonts.get(style.face).measure(text, style.size);
        let x = match style.align {
            Align::Left => self.margin,
            Align::Center => self.margin + ((self.content_width - width) / 2.0).max(0.0),
        };
        let baseline = row_top - style.padding - style.size;

        let encoded = self.fonts.get_mut(style.face).encode(text);
        self.stats.replaced_chars += encoded.replaced as u32;
        if !encoded.exact {
            self.current.push(Operation::new(
                "BDC",
                vec![
                    Object::Name(tags::SPAN.as_bytes().to_vec()),
                    Object::Dictionary(dictionary! {
                        "ActualText" => text_string(text),
                    }),
                ],
            ));
        }
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(style.face.resource_name().to_vec()),
                    style.size.into(),
                ],
            ),
            Operation::new("Td", vec![x.into(), baseline.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encoded.bytes, StringFormat::Hexadecimal)],
            ),
            Operation::new("ET", vec![]),
        ]);
        if !encoded.exact {
            self.end_marked();
        }

        self.cursor -= row;
        self.stats.line_count += 1;
    }

    fn begin_marked(&mut self, tag: &str) {
        self.current.push(Operation::new(
            "BMC",
            vec![Object::Name(tag.as_bytes().to_vec())],
        ));
    }

    fn end_marked(&mut self) {
        self.current.push(Operation::new("EMC", vec![]));
    }
}

impl DocumentVisitor for PageLayout<'_> {
    fn visit_title(&mut self, title: &str) -> Result<()> {
        let style = LineStyle::text(FontFace::Bold, self.options.title_size, Align::Center);
        let lines = self.wrap(title, &style);
        self.block(tags::TITLE, &lines, style, 0.0);
        self.spacer(self.options.spacer_pt);
        Ok(())
    }

    fn visit_contact(&mut self, contact: &ContactBlock<'_>) -> Result<()> {
        let face = FontFace::Regular;
        let size = self.options.contact_size;
        let rows: Vec<String> = contact.rows().into_iter().map(str::to_string).collect();

        let font = self.fonts.get(face);
        let widest = rows
            .iter()
            .map(|r| font.measure(r, size))
            .fold(0.0_f32, f32::max);
        let box_width = (widest + 4.0 * CONTACT_PADDING).min(self.content_width);

        let style = LineStyle {
            face,
            size,
            align: Align::Center,
            padding: CONTACT_PADDING,
            background: Some((self.options.contact_background, box_width)),
        };
        self.block(tags::CONTACT, &rows, style, 0.0);
        self.spacer(self.options.spacer_pt);
        Ok(())
    }

    fn visit_heading(&mut self, heading: &str) -> Result<()> {
        self.stats.add_section();
        let style = LineStyle::text(FontFace::Bold, self.options.heading_size, Align::Left);
        let lines = self.wrap(heading, &style);
        let first_body_line = self.options.body_size * self.options.line_spacing + HEADING_GAP;
        self.block(tags::HEADING, &lines, style, first_body_line);
        self.spacer(HEADING_GAP);
        Ok(())
    }

    fn visit_paragraph(&mut self, text: &str) -> Result<()> {
        self.stats.add_paragraph();
        let style = LineStyle::text(FontFace::Regular, self.options.body_size, Align::Left);
        let lines = self.wrap(text, &style);
        self.block(tags::PARAGRAPH, &lines, style, 0.0);
        self.spacer(self.options.paragraph_gap_pt);
        Ok(())
    }

    fn end_section(&mut self) -> Result<()> {
        self.spacer(self.options.spacer_pt);
        Ok(())
    }
}

fn assemble(
    doc: &ResumeDocument,
    options: &RenderOptions,
    pages: Vec<Vec<Operation>>,
    fonts: &FontSet,
) -> Result<Vec<u8>> {
    let (width, height) = options.page_dimensions();
    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let mut font_resources = Dictionary::new();
    for font in fonts.used() {
        let font_id = embed_font(&mut pdf, font);
        font_resources.set(font.kind().resource_name().to_vec(), font_id);
    }
    let resources_id = pdf.add_object(dictionary! {
        "Font" => font_resources,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| Error::Pdf(format!("content stream encoding failed: {}", e)))?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let mut info = dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
        "Creator" => Object::string_literal("resumedoc"),
    };
    if let Some(ref title) = doc.title {
        info.set("Title", text_string(title));
    }
    let created = match options.generated_at {
        Some(at) => Metadata {
            generated_at: Some(at),
            ..Default::default()
        }
        .pdf_date(),
        None => doc.metadata.pdf_date(),
    };
    if let Some(date) = created {
        info.set("CreationDate", Object::string_literal(date));
    }
    let info_id = pdf.add_object(info);
    pdf.trailer.set("Info", info_id);

    pdf.compress();

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer)
        .map_err(|e| Error::Pdf(format!("failed to serialize PDF: {}", e)))?;
    Ok(buffer)
}

/// Embed a font as a Type0 composite over a CIDFontType2 descendant.
///
/// Glyph ids are used as CIDs directly (`Identity-H` with an identity
/// `CIDToGIDMap`), so the `W` array and `ToUnicode` map are keyed by gid.
// TODO: subset the font program down to `Font::widths` glyphs; the whole
// DejaVu face is embedded today.
fn embed_font(pdf: &mut Document, font: &Font) -> ObjectId {
    let face = font.kind();
    let metrics = font.metrics();
    let program = face.program();

    let file_id = pdf.add_object(Stream::new(
        dictionary! { "Length1" => program.len() as i64 },
        program.to_vec(),
    ));
    let descriptor_id = pdf.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => face.base_font(),
        "Flags" => 32_i64,
        "FontBBox" => metrics.bbox.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
        "ItalicAngle" => 0_i64,
        "Ascent" => metrics.ascent,
        "Descent" => metrics.descent,
        "CapHeight" => metrics.cap_height,
        "StemV" => face.stem_v(),
        "FontFile2" => file_id,
    });

    let mut widths: Vec<Object> = Vec::new();
    for (gid, width) in font.widths() {
        widths.push(Object::Integer(i64::from(gid)));
        widths.push(Object::Array(vec![Object::Integer(i64::from(width))]));
    }
    let descendant_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => face.base_font(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0_i64,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => i64::from(font.default_width()),
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let cmap_id = pdf.add_object(Stream::new(dictionary! {}, font.to_unicode_cmap()));
    pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => face.base_font(),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(descendant_id)],
        "ToUnicode" => cmap_id,
    })
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
