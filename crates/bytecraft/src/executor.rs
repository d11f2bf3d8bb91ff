//! Runs compiled [Operation]s against a byte buffer.
//!
//! Each step consumes the `(record, offset)` accumulator and returns the next
//! one, so no cursor is shared between calls and one operation list can be
//! executed concurrently against many buffers.

use crate::{
    compiled::{CompiledRepeat, Operation, OperationKind, RepeatBound},
    errors::{ParseError, ReadError, SchemaError},
    value::{Parsed, Record, Value},
};

/// Executes `operations` against `data` starting at `start`.
pub fn execute(data: &[u8], operations: &[Operation], start: usize) -> Result<Parsed, ParseError> {
    let initial = Parsed {
        data: Record::with_capacity(operations.len()),
        offset: start,
    };

    operations
        .iter()
        .try_fold(initial, |acc, operation| step(data, operation, acc))
}

fn step(data: &[u8], operation: &Operation, acc: Parsed) -> Result<Parsed, ParseError> {
    let Parsed {
        data: mut record,
        offset,
    } = acc;
    let key = operation.key.as_str();

    let (value, next) = match &operation.kind {
        OperationKind::Scalar(reader) => {
            reader
                .read(data, offset)
                .map_err(|source| ParseError::Read {
                    field: key.to_string(),
                    source,
                })?
        }
        OperationKind::Conditional(reader) => {
            let (value, next) = reader.read(key, data, offset, &record)?;
            if next < offset {
                return Err(SchemaError::OffsetRewound {
                    field: key.to_string(),
                    offset,
                    next,
                }
                .into());
            }
            if value.is_absent() && next != offset {
                return Err(SchemaError::AbsentConsumed {
                    field: key.to_string(),
                    offset,
                    next,
                }
                .into());
            }
            if next > data.len() {
                return Err(ParseError::Read {
                    field: key.to_string(),
                    source: ReadError::OutOfBounds {
                        offset,
                        width: next - offset,
                        len: data.len(),
                    },
                });
            }
            (value, next)
        }
        OperationKind::Repeated(repeat) => execute_repeat(data, key, repeat, &record, offset)?,
    };

    record.insert(key, value);

    Ok(Parsed {
        data: record,
        offset: next,
    })
}

/// Decides how many elements `repeat` yields and decodes them in order.
fn execute_repeat(
    data: &[u8],
    key: &str,
    repeat: &CompiledRepeat,
    record: &Record,
    start: usize,
) -> Result<(Value, usize), ParseError> {
    let mut items = Vec::new();
    let mut offset = start;

    match &repeat.bound {
        RepeatBound::Count(sibling) => {
            let count = termination_count(key, sibling, record)?;
            tracing::trace!(field = key, count, offset, "repeating by count");

            while items.len() < count {
                let element = execute_element(data, key, repeat, items.len(), offset)?;
                offset = element.offset;
                items.push(element.data);
            }
        }
        RepeatBound::EndOfBuffer => {
            tracing::trace!(field = key, offset, len = data.len(), "repeating to end of buffer");

            while offset < data.len() {
                let element = execute_element(data, key, repeat, items.len(), offset)?;
                offset = element.offset;
                items.push(element.data);
            }
        }
    }

    tracing::trace!(field = key, elements = items.len(), offset, "repeat done");

    Ok((Value::List(items), offset))
}

/// Decodes element `index` of `key`. Every element must consume at least one
/// byte, whichever bound applies.
fn execute_element(
    data: &[u8],
    key: &str,
    repeat: &CompiledRepeat,
    index: usize,
    offset: usize,
) -> Result<Parsed, ParseError> {
    let element =
        execute(data, &repeat.operations, offset).map_err(|err| err.within(key, index))?;

    if element.offset <= offset {
        return Err(SchemaError::NoProgress {
            field: key.to_string(),
            offset,
        }
        .into());
    }

    Ok(element)
}

/// Reads the element count stored in the earlier sibling `sibling`.
fn termination_count(key: &str, sibling: &str, record: &Record) -> Result<usize, SchemaError> {
    let value = record.get(sibling).ok_or_else(|| SchemaError::MissingField {
        field: key.to_string(),
        reference: sibling.to_string(),
    })?;

    let count = value.as_u64().ok_or_else(|| SchemaError::NonNumericField {
        field: key.to_string(),
        reference: sibling.to_string(),
    })?;

    // A count beyond usize cannot be satisfied; the reads hit OutOfBounds first.
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}
