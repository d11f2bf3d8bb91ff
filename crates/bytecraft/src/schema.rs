//! Schema: compiled operation list used to parse byte buffers into records.

use crate::{
    compiled::{self, Operation},
    errors::{ParseError, SchemaError},
    executor,
    field::Field,
    value::Parsed,
};

/// A compiled schema. Use [Schema::compile] to build it from [Field]s once,
/// then [Schema::parse] as many buffers as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    operations: Vec<Operation>,
}

impl Schema {
    /// Compiles a slice of [Field]s into a schema. Fails if the layout is malformed.
    pub fn compile(fields: &[Field]) -> Result<Self, SchemaError> {
        let operations = compiled::compile(fields)?;
        tracing::debug!(operations = operations.len(), "compiled schema");

        Ok(Self { operations })
    }

    /// Compiled operations in declaration order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Parses `data` from its first byte.
    pub fn parse(&self, data: &[u8]) -> Result<Parsed, ParseError> {
        self.parse_at(data, 0)
    }

    /// Parses `data` starting at byte `offset`, which may be at most `data.len()`.
    pub fn parse_at(&self, data: &[u8], offset: usize) -> Result<Parsed, ParseError> {
        if offset > data.len() {
            return Err(ParseError::StartOutOfBounds {
                offset,
                len: data.len(),
            });
        }
        executor::execute(data, &self.operations, offset)
    }
}
