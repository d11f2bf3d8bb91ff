//! Context-dependent readers whose behaviour depends on sibling fields
//! already decoded in the same record.

use std::{fmt, sync::Arc};

use crate::{
    errors::{ParseError, ReadError, SchemaError},
    readers::ScalarReader,
    value::{Record, Value},
};

/// Signature of a user-supplied conditional reader.
pub type ConditionalFn =
    dyn Fn(&[u8], usize, &Record) -> Result<(Value, usize), ReadError> + Send + Sync;

#[derive(Clone)]
pub enum ConditionalReader {
    /// Reads with `reader` only if sibling `field` holds one of `any_of`.
    /// Otherwise yields [Value::Absent] and consumes nothing.
    When {
        field: String,
        any_of: Vec<u64>,
        reader: ScalarReader,
    },
    Custom(Arc<ConditionalFn>),
}

impl ConditionalReader {
    pub fn when(field: impl Into<String>, any_of: &[u64], reader: ScalarReader) -> Self {
        ConditionalReader::When {
            field: field.into(),
            any_of: any_of.to_vec(),
            reader,
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[u8], usize, &Record) -> Result<(Value, usize), ReadError> + Send + Sync + 'static,
    {
        ConditionalReader::Custom(Arc::new(f))
    }

    /// Sibling this reader depends on, if it names one.
    pub fn depends_on(&self) -> Option<&str> {
        match self {
            ConditionalReader::When { field, .. } => Some(field),
            ConditionalReader::Custom(_) => None,
        }
    }

    /// Reads the value for field `key` at `offset`, given the partial `record`.
    pub fn read(
        &self,
        key: &str,
        data: &[u8],
        offset: usize,
        record: &Record,
    ) -> Result<(Value, usize), ParseError> {
        let read_error = |source| ParseError::Read {
            field: key.to_string(),
            source,
        };

        match self {
            ConditionalReader::When {
                field,
                any_of,
                reader,
            } => {
                let selector = record
                    .get(field)
                    .ok_or_else(|| SchemaError::MissingField {
                        field: key.to_string(),
                        reference: field.clone(),
                    })?
                    .as_u64()
                    .ok_or_else(|| SchemaError::NonNumericField {
                        field: key.to_string(),
                        reference: field.clone(),
                    })?;

                if any_of.contains(&selector) {
                    reader.read(data, offset).map_err(read_error)
                } else {
                    Ok((Value::Absent, offset))
                }
            }
            ConditionalReader::Custom(f) => f(data, offset, record).map_err(read_error),
        }
    }
}

impl PartialEq for ConditionalReader {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ConditionalReader::When {
                    field: a_field,
                    any_of: a_any,
                    reader: a_reader,
                },
                ConditionalReader::When {
                    field: b_field,
                    any_of: b_any,
                    reader: b_reader,
                },
            ) => a_field == b_field && a_any == b_any && a_reader == b_reader,
            (ConditionalReader::Custom(a), ConditionalReader::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ConditionalReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionalReader::When {
                field,
                any_of,
                reader,
            } => f
                .debug_struct("When")
                .field("field", field)
                .field("any_of", any_of)
                .field("reader", reader)
                .finish(),
            ConditionalReader::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
