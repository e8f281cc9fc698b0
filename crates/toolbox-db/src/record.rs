use toolbox_types::{HEADER_MARKER, RawField, RawRecord, TAG_PREFIX};
use tracing::info;

use crate::error::ToolboxError;

/// Line number of the first line after the two header lines.
const FIRST_RECORD_LINE: usize = 3;

/// Parse a whole toolbox file into raw records.
///
/// The first line must start with `\_sh ` and the second must be blank.
/// Records are separated by blank lines; runs of blank lines never produce
/// empty records.
pub fn parse_toolbox(text: &str) -> Result<Vec<RawRecord>, ToolboxError> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .map(|l| l.trim_start_matches('\u{feff}'))
        .unwrap_or("");
    if !header.starts_with(HEADER_MARKER) {
        return Err(ToolboxError::MalformedHeader {
            line: header.to_string(),
        });
    }
    if let Some(second) = lines.next()
        && !second.trim().is_empty()
    {
        return Err(ToolboxError::ExtraHeaderContent {
            line: second.to_string(),
        });
    }

    let records = parse_records(lines, FIRST_RECORD_LINE)?;
    info!("parsed {} toolbox records", records.len());
    Ok(records)
}

/// Parse record lines without a header, numbering them from `first_line`.
pub fn parse_records<'a, I>(lines: I, first_line: usize) -> Result<Vec<RawRecord>, ToolboxError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    let mut current = RawRecord::new(first_line);

    for (offset, raw) in lines.into_iter().enumerate() {
        let lineno = first_line + offset;
        let line = raw.trim_end_matches(['\r', '\n']).trim_start();
        if line.trim_end().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::replace(&mut current, RawRecord::new(lineno + 1)));
            }
            continue;
        }
        let field = parse_field(line, lineno, &current)?;
        if current.is_empty() {
            current.line = lineno;
        }
        current.push(field);
    }

    if !current.is_empty() {
        records.push(current);
    }
    Ok(records)
}

fn parse_field(line: &str, lineno: usize, current: &RawRecord) -> Result<RawField, ToolboxError> {
    let Some((tag, value)) = line.split_once(' ') else {
        return Err(ToolboxError::MissingFieldSeparator {
            line: lineno,
            text: line.to_string(),
            record: current.source_text(),
        });
    };
    if !tag.starts_with(TAG_PREFIX) || tag.len() == TAG_PREFIX.len_utf8() {
        return Err(ToolboxError::MissingTagPrefix {
            line: lineno,
            text: line.to_string(),
            record: current.source_text(),
        });
    }
    Ok(RawField::new(tag, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_records_on_blank_lines() {
        let text = "\\_sh v3.0  400  MDF 4.0\n\n\\sro atim\n\\def dog\n\n\n\\sro minos\n\\def cat\n";
        let records = parse_toolbox(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 3);
        assert_eq!(records[0].fields[0], RawField::new("\\sro", "atim"));
        assert_eq!(records[1].line, 7);
        assert_eq!(records[1].fields[1].value, "cat");
    }

    #[test]
    fn keeps_value_after_first_space() {
        let text = "\\_sh v3.0\n\n\\def a dog; a horse  \r\n";
        let records = parse_toolbox(text).unwrap();
        assert_eq!(records[0].fields[0].value, "a dog; a horse");
    }

    #[test]
    fn accepts_empty_value_after_separator() {
        let text = "\\_sh v3.0  400  MDF 4.0\n\n\\sro atim\n\\stm \n\\def dog\n";
        let records = parse_toolbox(text).unwrap();
        assert_eq!(records[0].fields[1], RawField::new("\\stm", ""));
        assert_eq!(records[0].fields[2].value, "dog");
    }

    #[test]
    fn rejects_bad_header() {
        let err = parse_toolbox("\\sro atim\n\n").unwrap_err();
        assert!(matches!(err, ToolboxError::MalformedHeader { .. }));
        let err = parse_toolbox("").unwrap_err();
        assert!(matches!(err, ToolboxError::MalformedHeader { .. }));
    }

    #[test]
    fn rejects_non_blank_second_line() {
        let err = parse_toolbox("\\_sh v3.0\n\\sro atim\n").unwrap_err();
        assert!(matches!(err, ToolboxError::ExtraHeaderContent { .. }));
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn header_only_file_has_no_records() {
        assert!(parse_toolbox("\\_sh v3.0").unwrap().is_empty());
    }

    #[test]
    fn missing_separator_reports_line_and_partial_record() {
        let text = "\\_sh v3.0\n\n\\sro atim\n\\def dog\n\\gl\n";
        let err = parse_toolbox(text).unwrap_err();
        match err {
            ToolboxError::MissingFieldSeparator { line, text, record } => {
                assert_eq!(line, 5);
                assert_eq!(text, "\\gl");
                assert_eq!(record, "\\sro atim\n\\def dog");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_tag_prefix_reports_line() {
        let text = "\\_sh v3.0\n\n\\sro atim\nsomething broke here\n";
        let err = parse_toolbox(text).unwrap_err();
        assert!(matches!(err, ToolboxError::MissingTagPrefix { line: 4, .. }));
        assert_eq!(err.partial_record(), Some("\\sro atim"));
    }
}
