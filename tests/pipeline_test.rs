//! Integration tests for segmentation and model building.

use resumedoc::parser::{classify_header, SectionClassifier};
use resumedoc::{parse_text, parse_text_with_options, HeaderGate, ParseOptions, ResumeParser};

const SAMPLE: &str = "\
Jane Doe
jane@example.com
+1 555 0100

Summary
Backend engineer with ten years of experience.

Focus on storage systems.
Experience
Acme Corp, 2019-2024
Led the ingestion team.

Globex, 2015-2019
Skills
Rust, Go, SQL
Education
BSc Computer Science
";

#[test]
fn test_worked_example() {
    let doc = parse_text("Jane Doe\njane@x.com\n555-1234\nEXPERIENCE\nDid stuff");

    assert_eq!(doc.title.as_deref(), Some("Jane Doe"));
    assert_eq!(doc.contact.as_deref(), Some("jane@x.com\n555-1234"));
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].heading, "Experience");
    assert_eq!(doc.sections[0].paragraphs, vec!["Did stuff"]);
}

#[test]
fn test_full_resume_structure() {
    let doc = parse_text(SAMPLE);

    assert_eq!(doc.title.as_deref(), Some("Jane Doe"));
    assert_eq!(doc.contact.as_deref(), Some("jane@example.com\n+1 555 0100"));

    let headings: Vec<&str> = doc.sections.iter().map(|s| s.heading.as_str()).collect();
    assert_eq!(
        headings,
        vec!["Summary", "Experience", "Skills", "Education"]
    );

    assert_eq!(
        doc.sections[0].paragraphs,
        vec![
            "Backend engineer with ten years of experience.",
            "Focus on storage systems."
        ]
    );
    assert_eq!(
        doc.get_section("Experience").unwrap().paragraphs,
        vec!["Acme Corp, 2019-2024\nLed the ingestion team.", "Globex, 2015-2019"]
    );
}

#[test]
fn test_length_guard() {
    let long_header = format!("Experience {}", "x".repeat(39));
    assert_eq!(long_header.chars().count(), 50);
    assert!(classify_header(&long_header).is_none());

    let short_header = format!("Experience {}", "x".repeat(38));
    assert!(classify_header(&short_header).is_some());

    let text = format!("Jane\n{}\nDid stuff", long_header);
    let doc = parse_text(&text);
    assert!(doc.sections.is_empty());
}

#[test]
fn test_first_line_header_absorbed() {
    let doc = parse_text("Skills\nRust\nAwards\nNone");

    // The first line has no content before it, so it becomes the title.
    assert_eq!(doc.title.as_deref(), Some("Skills"));
    assert_eq!(doc.contact.as_deref(), Some("Rust"));
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].heading, "Awards");
}

#[test]
fn test_always_gate_splits_first_line() {
    let options = ParseOptions::new().with_header_gate(HeaderGate::Always);
    let doc = parse_text_with_options("Skills\nRust\nAwards\nNone", options).unwrap();

    assert!(doc.title.is_none());
    let headings: Vec<&str> = doc.sections.iter().map(|s| s.heading.as_str()).collect();
    assert_eq!(headings, vec!["Skills", "Awards"]);
}

#[test]
fn test_duplicate_headers_are_separate_sections() {
    let doc = parse_text("Jane\nSkills\nRust\nSkills\nGo");
    assert_eq!(doc.sections.len(), 2);
    assert_eq!(doc.sections[0].paragraphs, vec!["Rust"]);
    assert_eq!(doc.sections[1].paragraphs, vec!["Go"]);
}

#[test]
fn test_consecutive_headers_nest_as_content() {
    // The second header arrives while the buffer is empty and is kept as content.
    let map = SectionClassifier::new().classify("Jane\nSkills\nTechnical Skills\nRust");
    assert_eq!(map.keys(), vec!["name", "skills"]);
    assert_eq!(map.get("skills").unwrap().content, "Technical Skills\nRust");
}

#[test]
fn test_content_preservation() {
    let map = SectionClassifier::new().classify(SAMPLE);
    let input: Vec<&str> = SAMPLE.split('\n').collect();

    let mut rebuilt: Vec<String> = Vec::new();
    let mut cursor = 0;
    for (i, section) in map.iter().enumerate() {
        if i > 0 {
            // Each later entry was opened by the header line at the cursor.
            let header = input[cursor];
            assert_eq!(classify_header(header).as_deref(), Some(section.key.as_str()));
            rebuilt.push(header.to_string());
            cursor += 1;
        }
        for line in section.lines() {
            rebuilt.push(line.to_string());
            cursor += 1;
        }
    }

    assert_eq!(rebuilt, input);
}

#[test]
fn test_custom_keywords() {
    let options = ParseOptions::new().with_keywords(["leadership"]);
    let doc = parse_text_with_options("Jane\nLeadership\nMentored five\nSkills\nRust", options)
        .unwrap();

    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].heading, "Leadership");
    assert_eq!(doc.sections[0].paragraphs, vec!["Mentored five\nSkills\nRust"]);
}

#[test]
fn test_degenerate_inputs() {
    for text in ["", "   ", "\n\n", "\r\n"] {
        let doc = parse_text(text);
        assert!(doc.title.is_none(), "title for {:?}", text);
        assert!(doc.sections.is_empty(), "sections for {:?}", text);
    }
}

#[test]
fn test_crlf_matches_lf() {
    let lf = parse_text(SAMPLE);
    let crlf = parse_text(&SAMPLE.replace('\n', "\r\n"));
    assert_eq!(lf.title, crlf.title);
    assert_eq!(lf.contact, crlf.contact);
    assert_eq!(lf.sections, crlf.sections);
}

#[test]
fn test_parser_is_reusable_across_threads() {
    let parser = ResumeParser::new();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let doc = parser.parse(SAMPLE);
                assert_eq!(doc.sections.len(), 4);
            });
        }
    });
}
