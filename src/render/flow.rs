//! Flow (DOCX) rendering with docx-rs.

use std::io::Cursor;

use docx_rs::{AlignmentType, BreakType, Docx, PageMargin, Paragraph, Run, Style, StyleType};

use crate::error::{Error, Result};
use crate::model::ResumeDocument;

use super::options::points_to_twips;
use super::text::replace_controls;
use super::visitor::{walk, ContactBlock, DocumentVisitor};
use super::{DocumentRenderer, OutputFormat, RenderOptions, RenderResult, RenderStats};

/// Paragraph style identifiers written to `word/styles.xml`.
pub mod styles {
    /// Document title
    pub const TITLE: &str = "Title";
    /// Contact block
    pub const CONTACT: &str = "Contact";
    /// Section heading
    pub const HEADING: &str = "Heading1";
}

/// DOCX renderer built on docx-rs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowRenderer;

impl FlowRenderer {
    /// Create a new flow renderer.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for FlowRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    fn name(&self) -> &str {
        "docx-rs"
    }

    fn render(&self, doc: &ResumeDocument, options: &RenderOptions) -> Result<RenderResult> {
        let mut flow = FlowBuilder::new(options);
        walk(doc, options, &mut flow)?;
        let (paragraphs, stats) = flow.finish();

        let bytes = pack(options, paragraphs)?;
        log::debug!(
            "DOCX built: {} section(s), {} bytes",
            stats.section_count,
            bytes.len()
        );

        Ok(RenderResult::new(bytes, OutputFormat::Docx, stats))
    }
}

/// Collects body paragraphs in document order.
struct FlowBuilder<'o> {
    options: &'o RenderOptions,
    paragraphs: Vec<Paragraph>,
    stats: RenderStats,
}

impl<'o> FlowBuilder<'o> {
    fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            paragraphs: Vec::new(),
            stats: RenderStats::new(),
        }
    }

    fn finish(mut self) -> (Vec<Paragraph>, RenderStats) {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::new());
        }
        (self.paragraphs, self.stats)
    }

    fn spacer(&mut self) {
        self.paragraphs.push(Paragraph::new());
    }
}

impl DocumentVisitor for FlowBuilder<'_> {
    fn visit_title(&mut self, title: &str) -> Result<()> {
        let run = Run::new()
            .add_text(replace_controls(title))
            .bold()
            .size(half_points(self.options.title_size));
        self.paragraphs.push(
            Paragraph::new()
                .style(styles::TITLE)
                .align(AlignmentType::Center)
                .add_run(run),
        );
        self.spacer();
        Ok(())
    }

    fn visit_contact(&mut self, contact: &ContactBlock<'_>) -> Result<()> {
        let run = lines_run(&contact.rows()).size(half_points(self.options.contact_size));
        self.paragraphs.push(
            Paragraph::new()
                .style(styles::CONTACT)
                .align(AlignmentType::Center)
                .add_run(run),
        );
        self.spacer();
        Ok(())
    }

    fn visit_heading(&mut self, heading: &str) -> Result<()> {
        self.stats.add_section();
        let run = Run::new()
            .add_text(replace_controls(heading))
            .bold()
            .size(half_points(self.options.heading_size));
        self.paragraphs
            .push(Paragraph::new().style(styles::HEADING).add_run(run));
        Ok(())
    }

    fn visit_paragraph(&mut self, text: &str) -> Result<()> {
        self.stats.add_paragraph();
        let lines: Vec<&str> = text.lines().collect();
        let run = lines_run(&lines).size(half_points(self.options.body_size));
        self.paragraphs.push(Paragraph::new().add_run(run));
        Ok(())
    }

    fn end_section(&mut self) -> Result<()> {
        self.spacer();
        Ok(())
    }
}

/// One run holding the lines separated by line breaks.
fn lines_run(lines: &[&str]) -> Run {
    let mut run = Run::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(replace_controls(line));
    }
    run
}

/// Font size in half-points, the unit DOCX run properties use.
fn half_points(points: f32) -> usize {
    (points * 2.0).round().max(1.0) as usize
}

fn pack(options: &RenderOptions, paragraphs: Vec<Paragraph>) -> Result<Vec<u8>> {
    let (width, height) = options.page_dimensions();
    let margin = points_to_twips(options.margin_pt) as i32;

    let mut docx = Docx::new()
        .page_size(points_to_twips(width), points_to_twips(height))
        .page_margin(
            PageMargin::new()
                .top(margin)
                .bottom(margin)
                .left(margin)
                .right(margin),
        )
        .add_style(Style::new(styles::TITLE, StyleType::Paragraph).name("Title"))
        .add_style(Style::new(styles::CONTACT, StyleType::Paragraph).name("Contact"))
        .add_style(Style::new(styles::HEADING, StyleType::Paragraph).name("Heading 1"));

    for paragraph in paragraphs {
        docx = docx.add_paragraph(paragraph);
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| Error::Docx(format!("failed to package DOCX: {}", e)))?;
    Ok(cursor.into_inner())
}
