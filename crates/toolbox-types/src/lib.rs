//! Shared types that mirror the toolbox lexicon format and the entries built
//! from it.
//!
//! A toolbox file is a sequence of records, each a run of `\tag value` lines
//! terminated by a blank line. [`RawRecord`] keeps those lines verbatim;
//! [`Entry`] is the typed view produced once a record has been validated,
//! with every definition broken down into senses and subsenses
//! ([`Definition`], [`Sense`], [`Segment`]) and its glosses collected into
//! [`GlossPath`]s.
//!
//! ```rust
//! use toolbox_types::{FieldTag, GlossPath, PartOfSpeech};
//!
//! assert_eq!(FieldTag::from_tag("\\sro"), Some(FieldTag::Headword));
//! let pos = PartOfSpeech::parse("VTA-4");
//! assert_eq!(pos.main, "VTA");
//! assert_eq!(pos.sub.as_deref(), Some("4"));
//! let mut path = GlossPath::new(vec!["animal".into()]);
//! path.push("bird");
//! assert_eq!(path.segments(), ["animal", "bird"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Escape character every field tag starts with.
pub const TAG_PREFIX: char = '\\';

/// Marker the first line of a toolbox file must start with.
pub const HEADER_MARKER: &str = "\\_sh ";

/// Field tags the entry builder understands.
///
/// Anything else is kept in [`Entry::extra`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTag {
    Headword,
    Syllabics,
    PartOfSpeech,
    Stem,
    Date,
    Definition,
    Gloss,
    GlossQualifier,
}

impl FieldTag {
    /// Map a raw tag (including its leading backslash) to a known field.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "\\sro" => Some(FieldTag::Headword),
            "\\syl" => Some(FieldTag::Syllabics),
            "\\ps" => Some(FieldTag::PartOfSpeech),
            "\\stm" => Some(FieldTag::Stem),
            "\\dt" => Some(FieldTag::Date),
            "\\def" => Some(FieldTag::Definition),
            "\\gl" => Some(FieldTag::Gloss),
            "\\glp" => Some(FieldTag::GlossQualifier),
            _ => None,
        }
    }

    /// Raw tag as written in toolbox files.
    pub fn as_tag(self) -> &'static str {
        match self {
            FieldTag::Headword => "\\sro",
            FieldTag::Syllabics => "\\syl",
            FieldTag::PartOfSpeech => "\\ps",
            FieldTag::Stem => "\\stm",
            FieldTag::Date => "\\dt",
            FieldTag::Definition => "\\def",
            FieldTag::Gloss => "\\gl",
            FieldTag::GlossQualifier => "\\glp",
        }
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// One `\tag value` line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawField {
    pub tag: String,
    pub value: String,
}

impl RawField {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// The known field this tag names, if any.
    pub fn kind(&self) -> Option<FieldTag> {
        FieldTag::from_tag(&self.tag)
    }
}

/// Fields of one record in source order, plus the line the record starts on.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawRecord {
    /// 1-based line number of the first line belonging to this record.
    pub line: usize,
    pub fields: Vec<RawField>,
}

impl RawRecord {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            fields: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn push(&mut self, field: RawField) {
        self.fields.push(field);
    }

    /// Re-render the collected fields as `\tag value` lines, used to point a
    /// lexicographer at the broken spot in the source file.
    pub fn source_text(&self) -> String {
        let mut out = String::new();
        for field in &self.fields {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&field.tag);
            out.push(' ');
            out.push_str(&field.value);
        }
        out
    }
}

/// A character together with the bracket depth it sits at.
///
/// Depth is signed: unbalanced closing brackets drive it below zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DepthChar {
    pub depth: i32,
    pub ch: char,
}

impl DepthChar {
    pub fn new(depth: i32, ch: char) -> Self {
        Self { depth, ch }
    }
}

/// One level of a definition in all three of its forms.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Segment {
    /// Depth-annotated characters, asides intact.
    #[serde(skip)]
    pub annotated: Vec<DepthChar>,
    /// Every character, asides included.
    pub flattened: String,
    /// Depth-0 characters only, trimmed.
    pub canonical: String,
}

/// A `;`-delimited part of a definition and its `,`-delimited subsenses.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Sense {
    pub text: Segment,
    pub subsenses: Vec<Segment>,
}

/// One `\def` field.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Definition {
    pub text: Segment,
    pub senses: Vec<Sense>,
}

/// Ordered gloss segments an entry is indexed under.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct GlossPath(Vec<String>);

impl GlossPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }
}

/// Part-of-speech tag split into its primary and sub category (`VTA-4`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PartOfSpeech {
    pub raw: String,
    pub main: String,
    pub sub: Option<String>,
}

impl PartOfSpeech {
    /// Split on the first hyphen; an empty sub category is treated as absent.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once('-') {
            Some((main, sub)) if !sub.is_empty() => Self {
                raw: raw.to_string(),
                main: main.to_string(),
                sub: Some(sub.to_string()),
            },
            Some((main, _)) => Self {
                raw: raw.to_string(),
                main: main.to_string(),
                sub: None,
            },
            None => Self {
                raw: raw.to_string(),
                main: raw.to_string(),
                sub: None,
            },
        }
    }
}

/// Typed view of one validated record.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Entry {
    pub line: usize,
    pub headwords: Vec<String>,
    pub syllabics: Vec<String>,
    pub parts_of_speech: Vec<String>,
    pub pos: Option<PartOfSpeech>,
    pub stems: Vec<String>,
    /// Explicit stem when present, otherwise the first headword.
    pub stem: String,
    pub dates: Vec<String>,
    pub definitions: Vec<Definition>,
    pub glosses: Vec<GlossPath>,
    /// Unrecognised tags with their values in source order.
    pub extra: BTreeMap<String, Vec<String>>,
    /// Accumulated `\tag value` text of the source record.
    #[serde(skip)]
    pub source: String,
}

impl Entry {
    /// First headword form.
    pub fn headword(&self) -> &str {
        self.headwords.first().map(String::as_str).unwrap_or("")
    }

    pub fn senses(&self) -> impl Iterator<Item = &Sense> + '_ {
        self.definitions.iter().flat_map(|d| d.senses.iter())
    }

    pub fn subsenses(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.senses().flat_map(|s| s.subsenses.iter())
    }

    /// Canonical subsense strings in definition order.
    pub fn canonical_subsenses(&self) -> Vec<&str> {
        self.subsenses().map(|s| s.canonical.as_str()).collect()
    }
}

/// Non-fatal data-quality findings gathered while building the dictionary.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    QualifierWithoutSeparator {
        headword: String,
        line: usize,
        value: String,
    },
    MissingOptionalField {
        headword: String,
        line: usize,
        field: FieldTag,
    },
    NoMatchingSense {
        headword: String,
        line: usize,
        heading: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::QualifierWithoutSeparator {
                headword,
                line,
                value,
            } => write!(
                f,
                "line {line}: \\glp field without a separator: {value} in entry {headword}"
            ),
            Warning::MissingOptionalField {
                headword,
                line,
                field,
            } => write!(f, "line {line}: entry {headword} has no {field} field"),
            Warning::NoMatchingSense {
                headword,
                line,
                heading,
            } => write!(
                f,
                "line {line}: no sense of entry {headword} mentions heading {heading:?}"
            ),
        }
    }
}
