//! End-to-end text → model parsing.

use crate::error::Result;
use crate::model::{Metadata, ResumeDocument, SectionMap};

use super::builder::DocumentModelBuilder;
use super::classifier::SectionClassifier;
use super::contact::apply_contact_split;
use super::options::ParseOptions;

/// Résumé text parser.
///
/// Runs segmentation, title/contact splitting and model assembly. Each call
/// to [`ResumeParser::parse`] builds a fresh model; the parser holds no
/// per-call state and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ResumeParser {
    classifier: SectionClassifier,
    options: ParseOptions,
}

impl ResumeParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Result<Self> {
        let classifier = SectionClassifier::with_options(&options)?;
        Ok(Self {
            classifier,
            options,
        })
    }

    /// Options this parser was built with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Classify the text into raw sections, with title/contact split applied.
    pub fn sections(&self, text: &str) -> SectionMap {
        let mut sections = self.classifier.classify(text);
        apply_contact_split(&mut sections);
        sections
    }

    /// Parse text into a document model.
    pub fn parse(&self, text: &str) -> ResumeDocument {
        self.parse_with_metadata(text, Metadata::default())
    }

    /// Parse text into a document model carrying the given metadata.
    pub fn parse_with_metadata(&self, text: &str, mut metadata: Metadata) -> ResumeDocument {
        let mut sections = self.classifier.classify(text);
        let split = apply_contact_split(&mut sections);

        metadata.line_count = text.split('\n').count();
        let document = DocumentModelBuilder::new()
            .with_metadata(metadata)
            .build(&sections, split);

        log::debug!(
            "parsed {} lines into {} sections ({} paragraphs)",
            document.metadata.line_count,
            document.section_count(),
            document.paragraph_count()
        );

        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Section, CONTACT_KEY, NAME_KEY};

    #[test]
    fn test_worked_example() {
        let doc = ResumeParser::new().parse("Jane Doe\njane@x.com\n555-1234\nEXPERIENCE\nDid stuff");

        assert_eq!(doc.title.as_deref(), Some("Jane Doe"));
        assert_eq!(doc.contact.as_deref(), Some("jane@x.com\n555-1234"));
        assert_eq!(
            doc.sections,
            vec![Section {
                heading: "Experience".into(),
                paragraphs: vec!["Did stuff".into()],
            }]
        );
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        for text in ["", "   ", "\n\n\t\n"] {
            let doc = ResumeParser::new().parse(text);
            assert!(doc.title.is_none(), "title for {:?}", text);
            assert!(doc.sections.is_empty());
        }
        assert!(ResumeParser::new().parse("").is_empty());
    }

    #[test]
    fn test_sections_include_reserved_entries() {
        let sections = ResumeParser::new().sections("Jane\njane@x.com\nSkills\nRust");
        assert_eq!(sections.keys(), vec![NAME_KEY, CONTACT_KEY, "skills"]);
    }

    #[test]
    fn test_first_line_header_becomes_title() {
        let doc = ResumeParser::new().parse("Summary\nBuilds things\nSkills\nRust");
        assert_eq!(doc.title.as_deref(), Some("Summary"));
        assert_eq!(doc.contact.as_deref(), Some("Builds things"));
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, "Skills");
    }

    #[test]
    fn test_line_count_metadata() {
        let doc = ResumeParser::new().parse("a\nb\nc");
        assert_eq!(doc.metadata.line_count, 3);
    }
}
