//! Parsing options and configuration.

use super::classifier::{HEADER_KEYWORDS, MAX_HEADER_LEN};

/// Options for segmenting résumé text.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// When a header candidate may start a new section
    pub header_gate: HeaderGate,

    /// Header candidates must be shorter than this many characters
    pub max_header_len: usize,

    /// Keywords a header line must start with (matched case-insensitively)
    pub keywords: Vec<String>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header gate.
    pub fn with_header_gate(mut self, gate: HeaderGate) -> Self {
        self.header_gate = gate;
        self
    }

    /// Let every header candidate start a section, even with an empty buffer.
    pub fn always_split(mut self) -> Self {
        self.header_gate = HeaderGate::Always;
        self
    }

    /// Set the exclusive upper bound on header line length.
    pub fn with_max_header_len(mut self, len: usize) -> Self {
        self.max_header_len = len;
        self
    }

    /// Replace the keyword table.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Add a keyword to the table.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            header_gate: HeaderGate::RequireContent,
            max_header_len: MAX_HEADER_LEN,
            keywords: HEADER_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Transition rule for header candidates during scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderGate {
    /// A header starts a section only once the current buffer holds a line;
    /// otherwise it is kept as ordinary content
    #[default]
    RequireContent,
    /// Every header candidate starts a section
    Always,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .always_split()
            .with_max_header_len(30)
            .with_keyword("leadership");

        assert_eq!(options.header_gate, HeaderGate::Always);
        assert_eq!(options.max_header_len, 30);
        assert!(options.keywords.iter().any(|k| k == "leadership"));
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.header_gate, HeaderGate::RequireContent);
        assert_eq!(options.max_header_len, 50);
        assert_eq!(options.keywords.len(), 21);
    }

    #[test]
    fn test_with_keywords_replaces_table() {
        let options = ParseOptions::new().with_keywords(["a", "b"]);
        assert_eq!(options.keywords, vec!["a".to_string(), "b".to_string()]);
    }
}
