//! Rendering options and configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Twentieths of a point (DOCX page units) per point.
pub const TWIPS_PER_POINT: f32 = 20.0;

/// Options shared by the PDF and DOCX renderers.
///
/// Every field has a default, so a partial JSON file is a valid configuration:
///
/// ```
/// use resumedoc::render::{PageSize, RenderOptions};
///
/// let options: RenderOptions = serde_json::from_str(r#"{ "page_size": "letter" }"#).unwrap();
/// assert_eq!(options.page_size, PageSize::Letter);
/// assert_eq!(options.margin_pt, 54.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Page size
    pub page_size: PageSize,

    /// Uniform margin on all sides, in points
    pub margin_pt: f32,

    /// Title font size in points
    pub title_size: f32,

    /// Section heading font size in points
    pub heading_size: f32,

    /// Body paragraph font size in points
    pub body_size: f32,

    /// Contact line font size in points
    pub contact_size: f32,

    /// Line height as a multiple of font size
    pub line_spacing: f32,

    /// Height of spacer blocks in points
    pub spacer_pt: f32,

    /// Space after each body paragraph in points
    pub paragraph_gap_pt: f32,

    /// Text shown when contact content exists but every line is blank
    pub contact_placeholder: String,

    /// RGB fill (0.0-1.0) behind the contact table
    pub contact_background: [f32; 3],

    /// Generation timestamp written into document metadata
    pub generated_at: Option<DateTime<Utc>>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the margin in points.
    pub fn with_margin(mut self, points: f32) -> Self {
        self.margin_pt = points.max(0.0);
        self
    }

    /// Set the margin in inches.
    pub fn with_margin_inches(self, inches: f32) -> Self {
        self.with_margin(inches * POINTS_PER_INCH)
    }

    /// Set the title font size.
    pub fn with_title_size(mut self, size: f32) -> Self {
        self.title_size = size;
        self
    }

    /// Set the heading font size.
    pub fn with_heading_size(mut self, size: f32) -> Self {
        self.heading_size = size;
        self
    }

    /// Set the body font size.
    pub fn with_body_size(mut self, size: f32) -> Self {
        self.body_size = size;
        self
    }

    /// Set the placeholder for blank contact blocks.
    pub fn with_contact_placeholder(mut self, text: impl Into<String>) -> Self {
        self.contact_placeholder = text.into();
        self
    }

    /// Set the generation timestamp.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Page width and height in points.
    pub fn page_dimensions(&self) -> (f32, f32) {
        self.page_size.dimensions()
    }

    /// Usable width between the margins, in points.
    pub fn content_width(&self) -> f32 {
        let (width, _) = self.page_dimensions();
        (width - 2.0 * self.margin_pt).max(1.0)
    }

    /// Usable height between the margins, in points.
    pub fn content_height(&self) -> f32 {
        let (_, height) = self.page_dimensions();
        (height - 2.0 * self.margin_pt).max(1.0)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin_pt: 0.75 * POINTS_PER_INCH,
            title_size: 20.0,
            heading_size: 13.0,
            body_size: 10.5,
            contact_size: 10.0,
            line_spacing: 1.25,
            spacer_pt: 12.0,
            paragraph_gap_pt: 6.0,
            contact_placeholder: "Contact information not available".to_string(),
            contact_background: [0.95, 0.95, 0.95],
            generated_at: None,
        }
    }
}

/// Page size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// ISO A4, 210 × 297 mm
    #[default]
    A4,
    /// US Letter, 8.5 × 11 in
    Letter,
    /// Explicit size in points
    Custom {
        /// Width in points
        width_pt: f32,
        /// Height in points
        height_pt: f32,
    },
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.276, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }

    /// Parse a page size name ("a4", "letter").
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" | "us-letter" => Ok(PageSize::Letter),
            other => Err(format!("Unknown page size: {}", other)),
        }
    }
}

/// Convert points to twips, rounding to the nearest unit.
pub fn points_to_twips(points: f32) -> u32 {
    (points * TWIPS_PER_POINT).round().max(0.0) as u32
}
