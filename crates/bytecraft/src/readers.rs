//! Context-free scalar readers: fixed-width text, unsigned integers and doubles.

use std::fmt;

use crate::{bytes, errors::ReadError, value::Value};

/// Type of value a [ScalarReader] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReaderType {
    Text,
    Uint,
    Double,
}

impl fmt::Display for ReaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderType::Text => f.write_str("text"),
            ReaderType::Uint => f.write_str("uint"),
            ReaderType::Double => f.write_str("double"),
        }
    }
}

/// Reads one value of a fixed byte width. Depends only on the buffer and offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalarReader {
    kind: ReaderType,
    width: usize,
}

impl ScalarReader {
    /// Text of exactly `width` bytes.
    pub const fn text(width: usize) -> Self {
        ScalarReader {
            kind: ReaderType::Text,
            width,
        }
    }

    /// Big-endian unsigned integer of `width` bytes (1 to 8).
    pub const fn uint(width: usize) -> Self {
        ScalarReader {
            kind: ReaderType::Uint,
            width,
        }
    }

    /// Big-endian 64-bit IEEE-754 float.
    pub const fn double() -> Self {
        ScalarReader {
            kind: ReaderType::Double,
            width: 8,
        }
    }

    pub fn kind(&self) -> ReaderType {
        self.kind
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the width is supported for this reader type.
    pub fn is_valid(&self) -> bool {
        match self.kind {
            ReaderType::Text => self.width > 0,
            ReaderType::Uint => (1..=8).contains(&self.width),
            ReaderType::Double => self.width == 8,
        }
    }

    /// Decodes the value at `offset`, returning it with `offset + width`.
    pub fn read(&self, data: &[u8], offset: usize) -> Result<(Value, usize), ReadError> {
        let value = match self.kind {
            ReaderType::Text => Value::Text(bytes::read_latin1(data, offset, self.width)?),
            ReaderType::Uint => {
                let raw = bytes::read_uint_be(data, offset, self.width)?;
                match u32::try_from(raw) {
                    Ok(small) if self.width <= 4 => Value::U32(small),
                    _ => Value::U64(raw),
                }
            }
            ReaderType::Double => Value::Double(bytes::read_f64_be(data, offset)?),
        };

        Ok((value, offset + self.width))
    }
}
