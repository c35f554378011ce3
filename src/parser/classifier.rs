//! Header detection and section segmentation.
//!
//! Résumé text has no schema, so section boundaries are found with a
//! keyword heuristic: a short line that starts with a well-known section
//! word ("Experience", "Skills", ...) is treated as a header. The
//! predicate itself is a pure function ([`classify_header`]); the
//! scanning loop that applies it lives in [`SectionClassifier`].

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{SectionMap, NAME_KEY};

use super::options::{HeaderGate, ParseOptions};

/// Words a header line may start with.
pub const HEADER_KEYWORDS: [&str; 21] = [
    "education",
    "experience",
    "work",
    "employment",
    "skills",
    "technical",
    "projects",
    "achievements",
    "certifications",
    "languages",
    "interests",
    "summary",
    "objective",
    "profile",
    "qualifications",
    "publications",
    "presentations",
    "awards",
    "honors",
    "volunteer",
    "activities",
];

/// Header lines must be strictly shorter than this (in characters).
///
/// The length is measured after trimming, so indentation and trailing
/// whitespace never push a header over the limit.
pub const MAX_HEADER_LEN: usize = 50;

/// Classify a single line with the default keyword table.
///
/// Returns the normalized section key when the line is a header candidate.
///
/// # Example
///
/// ```
/// use resumedoc::parser::classify_header;
///
/// assert_eq!(classify_header("Work Experience"), Some("work_experience".to_string()));
/// assert_eq!(classify_header("Jane Doe"), None);
/// ```
pub fn classify_header(line: &str) -> Option<String> {
    default_classifier().classify(line)
}

/// Normalize header text into a section key.
pub fn normalize_key(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

fn default_classifier() -> &'static HeaderClassifier {
    static DEFAULT: OnceLock<HeaderClassifier> = OnceLock::new();
    DEFAULT.get_or_init(|| HeaderClassifier::compile(&HEADER_KEYWORDS, MAX_HEADER_LEN))
}

/// Keyword-prefix header predicate with a length guard.
#[derive(Debug, Clone)]
pub struct HeaderClassifier {
    pattern: Option<Regex>,
    max_len: usize,
}

impl HeaderClassifier {
    /// Build a classifier for the given keywords.
    pub fn new<S: AsRef<str>>(keywords: &[S], max_len: usize) -> Result<Self> {
        let pattern = build_pattern(keywords)?;
        Ok(Self { pattern, max_len })
    }

    /// Build a classifier from parse options.
    pub fn from_options(options: &ParseOptions) -> Result<Self> {
        Self::new(&options.keywords, options.max_header_len)
    }

    // The default table is fixed and escaped, so compilation cannot fail.
    fn compile<S: AsRef<str>>(keywords: &[S], max_len: usize) -> Self {
        Self::new(keywords, max_len).unwrap_or(Self {
            pattern: None,
            max_len,
        })
    }

    /// Check whether a line is a header candidate.
    pub fn is_candidate(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.chars().count() >= self.max_len {
            return false;
        }
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(trimmed))
    }

    /// Return the normalized key for a header candidate.
    pub fn classify(&self, line: &str) -> Option<String> {
        if self.is_candidate(line) {
            Some(normalize_key(line))
        } else {
            None
        }
    }
}

fn build_pattern<S: AsRef<str>>(keywords: &[S]) -> Result<Option<Regex>> {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    let source = format!("(?i)^(?:{})", alternatives.join("|"));
    Regex::new(&source)
        .map(Some)
        .map_err(|e| Error::Other(format!("invalid header keyword table: {}", e)))
}

/// Scanner state: whether the buffer for the current key holds any line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Empty,
    Accumulating,
}

struct Scanner<'a> {
    state: ScanState,
    key: String,
    buffer: Vec<&'a str>,
    sections: SectionMap,
}

impl<'a> Scanner<'a> {
    fn new() -> Self {
        Self {
            state: ScanState::Empty,
            key: NAME_KEY.to_string(),
            buffer: Vec::new(),
            sections: SectionMap::new(),
        }
    }

    fn accepts_header(&self, gate: HeaderGate) -> bool {
        match gate {
            HeaderGate::RequireContent => self.state == ScanState::Accumulating,
            HeaderGate::Always => true,
        }
    }

    fn push(&mut self, line: &'a str) {
        self.buffer.push(line);
        self.state = ScanState::Accumulating;
    }

    fn start_section(&mut self, key: String) {
        self.flush();
        log::debug!("section header detected: {}", key);
        self.key = key;
    }

    fn flush(&mut self) {
        let content = self.buffer.join("\n");
        self.sections.push(std::mem::take(&mut self.key), content);
        self.buffer.clear();
        self.state = ScanState::Empty;
    }

    fn finish(mut self) -> SectionMap {
        self.flush();
        self.sections
    }
}

/// Partitions raw text into named content blocks.
#[derive(Debug, Clone)]
pub struct SectionClassifier {
    headers: HeaderClassifier,
    gate: HeaderGate,
}

impl SectionClassifier {
    /// Create a classifier with the default keyword table.
    pub fn new() -> Self {
        Self {
            headers: default_classifier().clone(),
            gate: HeaderGate::default(),
        }
    }

    /// Create a classifier from parse options.
    pub fn with_options(options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            headers: HeaderClassifier::from_options(options)?,
            gate: options.header_gate,
        })
    }

    /// Scan the text and return its sections in encounter order.
    pub fn classify(&self, text: &str) -> SectionMap {
        let mut scanner = Scanner::new();

        for line in split_lines(text) {
            match self.headers.classify(line) {
                Some(key) if scanner.accepts_header(self.gate) => scanner.start_section(key),
                _ => scanner.push(line),
            }
        }

        scanner.finish()
    }
}

impl Default for SectionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Split on `\n`, dropping a trailing `\r` from each line.
///
/// Empty input yields a single empty line.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(map: &SectionMap) -> Vec<&str> {
        map.keys()
    }

    #[test]
    fn test_every_keyword_is_a_header() {
        for keyword in HEADER_KEYWORDS {
            assert_eq!(classify_header(keyword), Some(keyword.to_string()));

            let upper = keyword.to_uppercase();
            assert_eq!(classify_header(&upper), Some(keyword.to_string()));
        }
    }

    #[test]
    fn test_prefix_match_and_normalization() {
        assert_eq!(
            classify_header("Technical Skills"),
            Some("technical_skills".to_string())
        );
        assert_eq!(
            classify_header("  Work History  "),
            Some("work_history".to_string())
        );
        assert_eq!(classify_header("Workshops"), Some("workshops".to_string()));
    }

    #[test]
    fn test_non_headers() {
        assert_eq!(classify_header("Jane Doe"), None);
        assert_eq!(classify_header(""), None);
        assert_eq!(classify_header("My education"), None);
        assert_eq!(classify_header("Led a team of 5 engineers"), None);
    }

    #[test]
    fn test_length_guard() {
        let under = format!("Experience {}", "x".repeat(38));
        assert_eq!(under.chars().count(), 49);
        assert!(classify_header(&under).is_some());

        let at_limit = format!("Experience {}", "x".repeat(39));
        assert_eq!(at_limit.chars().count(), 50);
        assert!(classify_header(&at_limit).is_none());

        let text = format!("Jane\n{}\nmore", at_limit);
        let map = SectionClassifier::new().classify(&text);
        assert_eq!(keys(&map), vec![NAME_KEY]);
    }

    #[test]
    fn test_length_guard_measures_trimmed_line() {
        let padded = format!("    Experience{}", " ".repeat(60));
        assert!(padded.chars().count() >= MAX_HEADER_LEN);
        assert_eq!(classify_header(&padded).as_deref(), Some("experience"));

        let under = format!("Experience {}", "x".repeat(38));
        assert!(classify_header(&format!("\t{}   ", under)).is_some());
    }

    #[test]
    fn test_basic_segmentation() {
        let text = "Jane Doe\njane@x.com\nEXPERIENCE\nDid stuff\nSkills\nRust";
        let map = SectionClassifier::new().classify(text);

        assert_eq!(keys(&map), vec!["name", "experience", "skills"]);
        assert_eq!(map.get("name").unwrap().content, "Jane Doe\njane@x.com");
        assert_eq!(map.get("experience").unwrap().content, "Did stuff");
        assert_eq!(map.get("skills").unwrap().content, "Rust");
    }

    #[test]
    fn test_first_line_header_is_absorbed() {
        let text = "Experience\nAcme Corp\nSkills\nRust";
        let map = SectionClassifier::new().classify(text);

        assert_eq!(keys(&map), vec!["name", "skills"]);
        assert_eq!(map.get("name").unwrap().content, "Experience\nAcme Corp");
    }

    #[test]
    fn test_consecutive_headers_second_absorbed() {
        let text = "Jane\nSummary\nEducation\nMIT";
        let map = SectionClassifier::new().classify(text);

        assert_eq!(keys(&map), vec!["name", "summary"]);
        assert_eq!(map.get("summary").unwrap().content, "Education\nMIT");
    }

    #[test]
    fn test_blank_line_opens_the_gate() {
        let text = "\nExperience\nAcme";
        let map = SectionClassifier::new().classify(text);

        assert_eq!(keys(&map), vec!["name", "experience"]);
        assert_eq!(map.get("name").unwrap().content, "");
    }

    #[test]
    fn test_duplicate_headers_stay_separate() {
        let text = "Jane\nSkills\nRust\nExperience\nAcme\nSkills\nGo";
        let map = SectionClassifier::new().classify(text);

        assert_eq!(keys(&map), vec!["name", "skills", "experience", "skills"]);
        let skills: Vec<_> = map
            .iter()
            .filter(|s| s.key == "skills")
            .map(|s| s.content.as_str())
            .collect();
        assert_eq!(skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_content_preservation() {
        let text = "Jane\n\nSummary\nBuilder.\n\nLine two\nAwards\n  Best  \n";
        let map = SectionClassifier::new().classify(text);

        // Rebuild: every entry after the first was opened by exactly one header line.
        let headers = ["Summary", "Awards"];
        let mut rebuilt = Vec::new();
        for (i, section) in map.iter().enumerate() {
            if i > 0 {
                assert_eq!(normalize_key(headers[i - 1]), section.key);
                rebuilt.push(headers[i - 1]);
            }
            rebuilt.extend(section.lines());
        }

        assert_eq!(rebuilt, text.split('\n').collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_input() {
        let map = SectionClassifier::new().classify("");
        assert_eq!(keys(&map), vec![NAME_KEY]);
        assert_eq!(map.get(NAME_KEY).unwrap().content, "");
    }

    #[test]
    fn test_crlf_input() {
        let map = SectionClassifier::new().classify("Jane\r\nSkills\r\nRust\r\n");
        assert_eq!(keys(&map), vec!["name", "skills"]);
        assert_eq!(map.get("skills").unwrap().content, "Rust\n");
    }

    #[test]
    fn test_always_gate_splits_leading_header() {
        let options = ParseOptions::new().always_split();
        let classifier = SectionClassifier::with_options(&options).unwrap();
        let map = classifier.classify("Experience\nAcme");

        assert_eq!(keys(&map), vec!["name", "experience"]);
        assert_eq!(map.get("name").unwrap().content, "");
        assert_eq!(map.get("experience").unwrap().content, "Acme");
    }

    #[test]
    fn test_custom_keywords() {
        let options = ParseOptions::new().with_keywords(["leadership", "c++"]);
        let classifier = SectionClassifier::with_options(&options).unwrap();
        let map = classifier.classify("Jane\nLeadership\nRan things\nC++ Projects\nx\nSkills\ny");

        assert_eq!(keys(&map), vec!["name", "leadership", "c++_projects"]);
        assert_eq!(map.get("c++_projects").unwrap().content, "x\nSkills\ny");
    }

    #[test]
    fn test_empty_keyword_table_never_matches() {
        let classifier = HeaderClassifier::new::<&str>(&[], MAX_HEADER_LEN).unwrap();
        assert!(!classifier.is_candidate("Experience"));
    }
}
