//! Gloss-indexed dictionary built from toolbox lexicon records.
//!
//! Entries are indexed by their English gloss paths. Each top-level gloss
//! becomes a heading listing the entries whose senses mention it, followed by
//! subheadings for the second path segment.

pub mod dictionary;
pub mod headings;
pub mod index;
pub mod natural;

pub use dictionary::{Dictionary, DictionaryError, HeadingTree};
pub use headings::{
    ELISION_MARKER, Heading, HeadingEntry, SenseMatch, Subheading, escape_typesetting,
    filter_for_heading,
};
pub use index::{EntryId, GlossIndex, GlossNode};
pub use natural::{natural_cmp, sort_natural_by_key};
