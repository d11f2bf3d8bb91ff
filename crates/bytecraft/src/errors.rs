//! Error types for schema compilation, scalar reads and buffer parsing.

use thiserror::Error;

use crate::readers::ReaderType;

/// Errors produced by a single [crate::readers::ScalarReader] read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The read would consume bytes past the end of the buffer.
    #[error("read of {width} bytes at offset {offset} exceeds buffer length {len}")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },
    /// More than 8 bytes were requested for a single unsigned integer.
    #[error("cannot read {width} bytes into a 64-bit unsigned integer")]
    TooManyBytesRead { width: usize },
}

/// Errors caused by a malformed schema description.
///
/// Most of these are caught by [crate::compiled::compile]; the rest surface
/// on the first execution that hits them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Field name is empty.
    #[error("field name must not be empty")]
    EmptyFieldName,
    /// Two fields of the same record share a name.
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
    /// Reader width is not supported for its type.
    #[error("field `{field}`: {kind} reader cannot have width {width}")]
    InvalidWidth {
        field: String,
        kind: ReaderType,
        width: usize,
    },
    /// A field refers to a sibling that is not declared before it.
    #[error("field `{field}` refers to `{reference}`, which is not declared before it")]
    UndeclaredField { field: String, reference: String },
    /// A repeated field has no inner fields.
    #[error("repeated field `{0}` has an empty schema")]
    EmptyRepeat(String),
    /// The referenced sibling has not been decoded in the current record.
    #[error("field `{field}` needs `{reference}`, which has not been decoded yet")]
    MissingField { field: String, reference: String },
    /// The referenced sibling is not an unsigned integer.
    #[error("field `{field}` needs `{reference}` to be an unsigned integer")]
    NonNumericField { field: String, reference: String },
    /// An element of a repetition consumed no bytes.
    #[error("repeated field `{field}` made no progress at offset {offset}")]
    NoProgress { field: String, offset: usize },
    /// A conditional reader returned an offset before the one it was given.
    #[error("field `{field}` moved the offset back from {offset} to {next}")]
    OffsetRewound {
        field: String,
        offset: usize,
        next: usize,
    },
    /// A conditional reader reported an absent value but still moved the offset.
    #[error("field `{field}` is absent but moved the offset from {offset} to {next}")]
    AbsentConsumed {
        field: String,
        offset: usize,
        next: usize,
    },
    /// No reader is registered for this type and width.
    #[error("no {kind} reader registered for width {width}")]
    UnknownReader { kind: ReaderType, width: usize },
}

/// Errors produced when executing a compiled schema against a buffer.
///
/// Any error aborts the whole parse; no partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A scalar read failed while decoding `field`.
    #[error("field `{field}`: {source}")]
    Read {
        field: String,
        #[source]
        source: ReadError,
    },
    /// The start offset lies past the end of the buffer.
    #[error("start offset {offset} exceeds buffer length {len}")]
    StartOutOfBounds { offset: usize, len: usize },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ParseError {
    /// Returns true if the parse ran past the end of the buffer.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            ParseError::Read {
                source: ReadError::OutOfBounds { .. },
                ..
            } | ParseError::StartOutOfBounds { .. }
        )
    }

    /// Path of the field that was being decoded, when known.
    ///
    /// Fields inside repetitions are qualified with the element index, as in
    /// `records[3].dollarAmount`.
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::Read { field, .. } => Some(field.as_str()),
            ParseError::Schema(
                SchemaError::MissingField { field, .. }
                | SchemaError::NonNumericField { field, .. }
                | SchemaError::NoProgress { field, .. }
                | SchemaError::OffsetRewound { field, .. }
                | SchemaError::AbsentConsumed { field, .. },
            ) => Some(field.as_str()),
            ParseError::StartOutOfBounds { .. } | ParseError::Schema(_) => None,
        }
    }

    /// Qualifies the field path with element `index` of the repeated field `parent`.
    pub(crate) fn within(mut self, parent: &str, index: usize) -> Self {
        if let Some(field) = self.field_mut() {
            *field = format!("{parent}[{index}].{field}");
        }
        self
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self {
            ParseError::Read { field, .. }
            | ParseError::Schema(
                SchemaError::MissingField { field, .. }
                | SchemaError::NonNumericField { field, .. }
                | SchemaError::NoProgress { field, .. }
                | SchemaError::OffsetRewound { field, .. }
                | SchemaError::AbsentConsumed { field, .. },
            ) => Some(field),
            ParseError::StartOutOfBounds { .. } | ParseError::Schema(_) => None,
        }
    }
}
