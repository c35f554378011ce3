//! Résumé text parsing module.
//!
//! Raw text flows through three stages: [`SectionClassifier`] partitions it
//! into keyed blocks, [`apply_contact_split`] separates the title from the
//! contact lines of the first block, and [`DocumentModelBuilder`] produces
//! the [`ResumeDocument`](crate::model::ResumeDocument).

mod builder;
mod classifier;
mod contact;
mod options;
mod resume_parser;

pub use builder::{display_heading, split_paragraphs, title_case, DocumentModelBuilder};
pub use classifier::{
    classify_header, normalize_key, HeaderClassifier, SectionClassifier, HEADER_KEYWORDS,
    MAX_HEADER_LEN,
};
pub use contact::{apply_contact_split, split_contact, ContactSplit};
pub use options::{HeaderGate, ParseOptions};
pub use resume_parser::ResumeParser;
