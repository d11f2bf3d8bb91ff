//! Declarative description of a record layout, compiled by [crate::Schema].

use crate::{conditional::ConditionalReader, readers::ScalarReader};

/// A single named field in a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key used in the decoded [crate::value::Record].
    pub name: String,
    pub spec: FieldSpec,
}

impl Field {
    pub fn scalar(name: impl Into<String>, reader: ScalarReader) -> Self {
        Field {
            name: name.into(),
            spec: FieldSpec::Scalar(reader),
        }
    }

    pub fn conditional(name: impl Into<String>, reader: ConditionalReader) -> Self {
        Field {
            name: name.into(),
            spec: FieldSpec::Conditional(reader),
        }
    }

    /// Repeats `fields` as many times as the earlier sibling `until` says,
    /// or to the end of the buffer when `until` is `None`.
    pub fn repeated(name: impl Into<String>, fields: Vec<Field>, until: Option<&str>) -> Self {
        Field {
            name: name.into(),
            spec: FieldSpec::Repeated(RepeatedSpec {
                fields,
                until: until.map(str::to_string),
            }),
        }
    }
}

/// How a field is decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    /// Fixed-width read that depends only on buffer and offset.
    Scalar(ScalarReader),
    /// Read that may depend on siblings decoded earlier in the same record.
    Conditional(ConditionalReader),
    /// Nested record applied repeatedly.
    Repeated(RepeatedSpec),
}

/// Parameters for a repeated sub-record.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatedSpec {
    /// Layout of one element.
    pub fields: Vec<Field>,
    /// Earlier sibling whose value is the element count.
    pub until: Option<String>,
}
