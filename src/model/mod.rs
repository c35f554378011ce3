//! Document model types for résumé content representation.
//!
//! The model is the intermediate representation shared by every renderer.
//! Text segmentation produces a [`SectionMap`]; the model builder turns it
//! into a [`ResumeDocument`] that both the PDF and DOCX renderers consume.

mod document;
mod section;

pub use document::{Metadata, ResumeDocument};
pub use section::{RawSection, Section, SectionMap, CONTACT_KEY, NAME_KEY};
