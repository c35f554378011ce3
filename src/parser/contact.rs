//! Title / contact separation for the leading name block.

use crate::model::{RawSection, SectionMap, CONTACT_KEY, NAME_KEY};
use crate::render::replace_controls;

/// Title and contact separated from the name block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSplit {
    /// First line of the block, trimmed; `None` if blank
    pub title: Option<String>,

    /// Remaining lines joined and trimmed; `None` for a single-line block
    pub contact: Option<String>,
}

/// Split a name block into title and contact.
///
/// A block with more than one line yields its first line as the title and
/// the rest as contact. A single-line block is all title. Control
/// characters count as blank.
pub fn split_contact(block: &str) -> ContactSplit {
    let block = replace_controls(block);
    let mut lines = block.split('\n');
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    let title = non_blank(first.trim());
    if rest.is_empty() {
        return ContactSplit {
            title,
            contact: None,
        };
    }

    ContactSplit {
        title,
        contact: Some(rest.join("\n").trim().to_string()),
    }
}

fn non_blank(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Run the split against the `name` entry of a section map.
///
/// The `name` entry is rewritten to hold only the title and a `contact`
/// entry is inserted right after it when contact lines were found.
pub fn apply_contact_split(sections: &mut SectionMap) -> ContactSplit {
    let Some(index) = sections.position(NAME_KEY) else {
        return ContactSplit::default();
    };

    let split = match sections.get(NAME_KEY) {
        Some(name) => split_contact(&name.content),
        None => return ContactSplit::default(),
    };

    if let Some(name) = sections.get_mut(NAME_KEY) {
        name.content = split.title.clone().unwrap_or_default();
    }
    if let Some(ref contact) = split.contact {
        sections.insert(index + 1, RawSection::new(CONTACT_KEY, contact.clone()));
    }

    split
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_multi_line() {
        let split = split_contact("Jane Doe\njane@x.com\n555-1234");
        assert_eq!(split.title.as_deref(), Some("Jane Doe"));
        assert_eq!(split.contact.as_deref(), Some("jane@x.com\n555-1234"));
    }

    #[test]
    fn test_split_single_line() {
        let split = split_contact("  Jane Doe ");
        assert_eq!(split.title.as_deref(), Some("Jane Doe"));
        assert!(split.contact.is_none());
    }

    #[test]
    fn test_split_trims_contact_block() {
        let split = split_contact("Jane\n\n  jane@x.com\n\n");
        assert_eq!(split.contact.as_deref(), Some("jane@x.com"));
    }

    #[test]
    fn test_blank_trailing_lines_keep_empty_contact() {
        let split = split_contact("Jane\n   \n");
        assert_eq!(split.title.as_deref(), Some("Jane"));
        assert_eq!(split.contact.as_deref(), Some(""));
    }

    #[test]
    fn test_control_only_lines_are_blank() {
        let split = split_contact("\x07\nx@y\n\x1b");
        assert!(split.title.is_none());
        assert_eq!(split.contact.as_deref(), Some("x@y"));

        let split = split_contact("Jane\n\x07");
        assert_eq!(split.contact.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_block() {
        let split = split_contact("");
        assert_eq!(split, ContactSplit::default());
    }

    #[test]
    fn test_apply_rewrites_map() {
        let mut map = SectionMap::new();
        map.push(NAME_KEY, "Jane\njane@x.com");
        map.push("skills", "Rust");

        let split = apply_contact_split(&mut map);

        assert_eq!(split.title.as_deref(), Some("Jane"));
        assert_eq!(map.keys(), vec![NAME_KEY, CONTACT_KEY, "skills"]);
        assert_eq!(map.get(NAME_KEY).unwrap().content, "Jane");
        assert_eq!(map.get(CONTACT_KEY).unwrap().content, "jane@x.com");
    }

    #[test]
    fn test_apply_without_name_entry() {
        let mut map = SectionMap::new();
        map.push("skills", "Rust");
        assert_eq!(apply_contact_split(&mut map), ContactSplit::default());
        assert_eq!(map.len(), 1);
    }
}
