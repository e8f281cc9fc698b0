use thiserror::Error;
use toolbox_types::FieldTag;

/// Fatal problems in a toolbox file.
///
/// Header errors abort before any record is read. Line and entry errors
/// carry the text collected for the record so far, since they usually mean a
/// stray or missing line break upstream shifted a record boundary.
#[derive(Debug, Error)]
pub enum ToolboxError {
    #[error("first line is not as expected (should start with \"\\_sh \"): {line:?}")]
    MalformedHeader { line: String },

    #[error("more than one line in the toolbox file header: {line:?}")]
    ExtraHeaderContent { line: String },

    #[error("line {line} does not have a mapping (no space after the tag): {text:?}\n\nentry so far:\n{record}")]
    MissingFieldSeparator {
        line: usize,
        text: String,
        record: String,
    },

    #[error("line {line} is missing a toolbox key: {text:?}\n\nentry so far:\n{record}")]
    MissingTagPrefix {
        line: usize,
        text: String,
        record: String,
    },

    #[error(
        "the entry starting at line {line} is missing the {field} field. Likely, an entry got \
         separated by an extra line break, which makes it indistinguishable from two entries.\n\n\
         entry so far:\n{record}"
    )]
    MissingRequiredField {
        line: usize,
        field: FieldTag,
        record: String,
    },
}

impl ToolboxError {
    /// Source line the error points at, when it is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ToolboxError::MalformedHeader { .. } => Some(1),
            ToolboxError::ExtraHeaderContent { .. } => Some(2),
            ToolboxError::MissingFieldSeparator { line, .. }
            | ToolboxError::MissingTagPrefix { line, .. }
            | ToolboxError::MissingRequiredField { line, .. } => Some(*line),
        }
    }

    /// Accumulated record text, for errors raised mid-record.
    pub fn partial_record(&self) -> Option<&str> {
        match self {
            ToolboxError::MissingFieldSeparator { record, .. }
            | ToolboxError::MissingTagPrefix { record, .. }
            | ToolboxError::MissingRequiredField { record, .. } => Some(record),
            _ => None,
        }
    }
}
