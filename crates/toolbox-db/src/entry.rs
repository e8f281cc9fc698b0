use std::collections::BTreeMap;

use toolbox_types::{Entry, FieldTag, GlossPath, PartOfSpeech, RawRecord, Warning};
use tracing::{info, warn};

use crate::error::ToolboxError;
use crate::nesting::segment_definition;

/// Entries built from a file plus the data-quality warnings raised on the way.
#[derive(Clone, Debug, Default)]
pub struct BuiltEntries {
    pub entries: Vec<Entry>,
    pub warnings: Vec<Warning>,
}

/// Build entries for every non-empty record, failing on the first record
/// without a headword.
pub fn build_entries(records: &[RawRecord]) -> Result<BuiltEntries, ToolboxError> {
    let mut built = BuiltEntries::default();
    for record in records.iter().filter(|r| !r.is_empty()) {
        let entry = build_entry(record, &mut built.warnings)?;
        built.entries.push(entry);
    }
    info!(
        "built {} entries ({} warnings)",
        built.entries.len(),
        built.warnings.len()
    );
    Ok(built)
}

/// Turn one raw record into an [`Entry`].
///
/// Only `\sro` is required. Missing `\syl`, `\ps` and `\def` fields default
/// to empty and are reported through `warnings`.
pub fn build_entry(record: &RawRecord, warnings: &mut Vec<Warning>) -> Result<Entry, ToolboxError> {
    let mut entry = Entry {
        line: record.line,
        source: record.source_text(),
        ..Entry::default()
    };
    let mut definitions = Vec::new();
    let mut extra: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for field in &record.fields {
        let value = field.value.clone();
        match field.kind() {
            Some(FieldTag::Headword) => entry.headwords.push(value),
            Some(FieldTag::Syllabics) => entry.syllabics.push(value),
            Some(FieldTag::PartOfSpeech) => entry.parts_of_speech.push(value),
            Some(FieldTag::Stem) => entry.stems.push(value),
            Some(FieldTag::Date) => entry.dates.push(value),
            Some(FieldTag::Definition) => definitions.push(value),
            Some(FieldTag::Gloss | FieldTag::GlossQualifier) => {}
            None => extra.entry(field.tag.clone()).or_default().push(value),
        }
    }

    if entry.headwords.is_empty() {
        return Err(ToolboxError::MissingRequiredField {
            line: record.line,
            field: FieldTag::Headword,
            record: entry.source,
        });
    }
    let headword = entry.headwords[0].trim().to_string();

    for (field, missing) in [
        (FieldTag::Syllabics, entry.syllabics.is_empty()),
        (FieldTag::PartOfSpeech, entry.parts_of_speech.is_empty()),
        (FieldTag::Definition, definitions.is_empty()),
    ] {
        if missing {
            record_warning(
                warnings,
                Warning::MissingOptionalField {
                    headword: headword.clone(),
                    line: record.line,
                    field,
                },
            );
        }
    }

    entry.stem = entry
        .stems
        .first()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(&headword)
        .to_string();
    entry.pos = entry.parts_of_speech.first().map(|p| PartOfSpeech::parse(p));
    entry.definitions = definitions.iter().map(|d| segment_definition(d)).collect();
    entry.glosses = extract_glosses(record, &headword, warnings);
    entry.extra = extra;
    Ok(entry)
}

/// Collect gloss paths from `\gl`/`\glp` fields in source order.
///
/// A `\gl` is a path of its own and becomes the parent of the qualifiers
/// that follow it. Each `\glp` yields a sibling `[parent, after]` path,
/// taking the part before its dash as parent when no `\gl` precedes it.
fn extract_glosses(record: &RawRecord, headword: &str, warnings: &mut Vec<Warning>) -> Vec<GlossPath> {
    let mut paths = Vec::new();
    let mut primary: Option<&str> = None;

    for field in &record.fields {
        let value = field.value.trim();
        if value.is_empty() {
            continue;
        }
        match field.kind() {
            Some(FieldTag::Gloss) => {
                primary = Some(value);
                paths.push(GlossPath::new(vec![value.to_string()]));
            }
            Some(FieldTag::GlossQualifier) => {
                let (before, after) = match value.split_once(is_dash) {
                    Some((before, after)) => (before.trim(), after.trim()),
                    None => {
                        record_warning(
                            warnings,
                            Warning::QualifierWithoutSeparator {
                                headword: headword.to_string(),
                                line: record.line,
                                value: value.to_string(),
                            },
                        );
                        ("", value)
                    }
                };
                let parent = primary.or(Some(before).filter(|b| !b.is_empty()));
                let mut path = GlossPath::new(parent.map(str::to_string).into_iter().collect());
                if !after.is_empty() {
                    path.push(after);
                }
                if !path.is_empty() {
                    paths.push(path);
                }
            }
            _ => {}
        }
    }

    paths
}

fn is_dash(c: char) -> bool {
    matches!(c, '-' | '\u{2013}' | '\u{2014}')
}

fn record_warning(warnings: &mut Vec<Warning>, warning: Warning) {
    warn!("{warning}");
    warnings.push(warning);
}
