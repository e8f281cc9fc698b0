//! Turning index nodes into sorted headings.
//!
//! For every heading, each registered entry is narrowed to the subsenses
//! that mention the heading text. The rest of the subsense becomes the
//! display fragment, with the heading itself elided:
//!
//! | subsense           | heading | fragment                  |
//! |--------------------|---------|---------------------------|
//! | `cat`              | `cat`   | (empty)                   |
//! | `wild cat`         | `cat`   | `wild`                    |
//! | `wild cat spotted` | `cat`   | `wild` ~ `spotted`        |

use std::collections::HashMap;

use serde::Serialize;
use toolbox_types::{Entry, Warning};
use tracing::warn;

use crate::index::{EntryId, GlossIndex, GlossNode};
use crate::natural::{natural_cmp, sort_natural_by_key};

/// Typeset marker standing in for the elided heading text.
pub const ELISION_MARKER: &str = "{\\raisebox{-.25em}{\\textasciitilde}} ";

/// A subsense split around the first occurrence of a heading.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SenseMatch<'s> {
    pub prefix: &'s str,
    pub suffix: &'s str,
}

impl<'s> SenseMatch<'s> {
    /// Split `text` around the first occurrence of `heading`.
    pub fn split(text: &'s str, heading: &str) -> Option<Self> {
        if heading.is_empty() {
            return None;
        }
        text.find(heading).map(|at| Self {
            prefix: &text[..at],
            suffix: &text[at + heading.len()..],
        })
    }

    /// Display fragment: escaped, trimmed sides joined by the elision marker.
    pub fn fragment(&self) -> String {
        let prefix = escape_typesetting(self.prefix.trim());
        let suffix = escape_typesetting(self.suffix.trim());
        match (prefix.is_empty(), suffix.is_empty()) {
            (true, true) => String::new(),
            (false, true) => prefix,
            (true, false) => suffix,
            (false, false) => format!("{prefix}{ELISION_MARKER}{suffix}"),
        }
    }
}

/// Escape characters the typesetter treats as markup.
pub fn escape_typesetting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '&' | '{' | '}' | '#' | '$') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Keep the senses containing `heading`, split around it.
pub fn filter_senses<'s, I>(heading: &str, senses: I) -> Vec<SenseMatch<'s>>
where
    I: IntoIterator<Item = &'s str>,
{
    senses
        .into_iter()
        .filter_map(|sense| SenseMatch::split(sense, heading))
        .collect()
}

/// Canonical subsenses of `entry` that mention `heading`.
pub fn filter_for_heading<'e>(heading: &str, entry: &'e Entry) -> Vec<SenseMatch<'e>> {
    filter_senses(heading, entry.subsenses().map(|s| s.canonical.as_str()))
}

/// One entry as listed under a heading.
#[derive(Clone, Debug, Serialize)]
pub struct HeadingEntry<'a> {
    pub fragment: String,
    #[serde(skip)]
    pub prefix: &'a str,
    #[serde(skip)]
    pub suffix: &'a str,
    pub entry: &'a Entry,
}

impl<'a> HeadingEntry<'a> {
    pub fn new(matched: SenseMatch<'a>, entry: &'a Entry) -> Self {
        Self {
            fragment: matched.fragment(),
            prefix: matched.prefix,
            suffix: matched.suffix,
            entry,
        }
    }

    fn unmatched(entry: &'a Entry) -> Self {
        Self {
            fragment: String::new(),
            prefix: "",
            suffix: "",
            entry,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Subheading<'a> {
    pub text: String,
    pub entries: Vec<HeadingEntry<'a>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Heading<'a> {
    pub text: String,
    pub entries: Vec<HeadingEntry<'a>>,
    pub subheadings: Vec<Subheading<'a>>,
}

/// Order by suffix, then stably by prefix.
pub fn sort_heading_entries(entries: &mut [HeadingEntry<'_>]) {
    sort_natural_by_key(entries, |e| e.suffix);
    sort_natural_by_key(entries, |e| e.prefix);
}

/// Order subheading keys by the text after, then before, the parent heading.
pub fn sort_subheading_keys<T>(keys: &mut [(&str, T)], heading: &str) {
    let split = |key: &str| -> (String, String) {
        match SenseMatch::split(key, heading) {
            Some(m) => (m.prefix.to_string(), m.suffix.to_string()),
            None => (key.to_string(), String::new()),
        }
    };
    keys.sort_by(|a, b| natural_cmp(&split(a.0).1, &split(b.0).1));
    keys.sort_by(|a, b| natural_cmp(&split(a.0).0, &split(b.0).0));
}

/// Everything heading assembly needs to know about the entries.
pub struct MatchContext<'a> {
    pub entries: &'a [Entry],
    /// Matchable subsense strings, one list per entry.
    pub senses: &'a [Vec<String>],
    /// Replacement match text for top-level headings.
    pub heading_text: &'a HashMap<String, String>,
}

impl<'a> MatchContext<'a> {
    fn heading_entries(
        &self,
        heading: &str,
        ids: &[EntryId],
        warnings: &mut Vec<Warning>,
    ) -> Vec<HeadingEntry<'a>> {
        let mut matched = Vec::new();
        let mut unmatched = Vec::new();
        for &EntryId(idx) in ids {
            let entry = &self.entries[idx];
            let senses = self.senses.get(idx).map(Vec::as_slice).unwrap_or(&[]);
            let hits = filter_senses(heading, senses.iter().map(String::as_str));
            if hits.is_empty() {
                let warning = Warning::NoMatchingSense {
                    headword: entry.headword().to_string(),
                    line: entry.line,
                    heading: heading.to_string(),
                };
                warn!("{warning}");
                warnings.push(warning);
                // Kept so every indexed entry reaches the output; filter_for_heading alone would drop it.
                unmatched.push(HeadingEntry::unmatched(entry));
            } else {
                matched.extend(hits.into_iter().map(|m| HeadingEntry::new(m, entry)));
            }
        }
        sort_heading_entries(&mut matched);
        sort_natural_by_key(&mut unmatched, |e| e.entry.headword());
        matched.extend(unmatched);
        matched
    }

    fn heading(&self, key: &str, node: &GlossNode, warnings: &mut Vec<Warning>) -> Heading<'a> {
        let target = self.heading_text.get(key).map(String::as_str).unwrap_or(key);
        let entries = self.heading_entries(target, node.entries(), warnings);

        let mut children: Vec<(&str, &GlossNode)> = node.children().collect();
        sort_subheading_keys(&mut children, key);
        let mut subheadings = Vec::with_capacity(children.len());
        for (sub, child) in children {
            subheadings.push(Subheading {
                text: sub.to_string(),
                entries: self.heading_entries(sub, child.entries(), warnings),
            });
        }

        Heading {
            text: key.to_string(),
            entries,
            subheadings,
        }
    }
}

/// Build the ordered heading tree from the top two levels of the index.
pub fn assemble<'a>(
    index: &GlossIndex,
    ctx: &MatchContext<'a>,
    warnings: &mut Vec<Warning>,
) -> Vec<Heading<'a>> {
    let mut headings = Vec::new();
    for (key, node) in index.headings() {
        if key.trim().is_empty() {
            continue;
        }
        headings.push(ctx.heading(key, node, warnings));
    }
    sort_natural_by_key(&mut headings, |h| h.text.as_str());
    headings
}
