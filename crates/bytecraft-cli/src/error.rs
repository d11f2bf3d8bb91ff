//! Errors raised by the MPS7 glue around the schema engine.

use std::{io, path::PathBuf};

use bytecraft::{ParseError, SchemaError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    /// The input file could not be read.
    #[error("cannot read '{path}'")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A JSON schema file could not be read or decoded.
    #[error("invalid schema file '{path}': {detail}")]
    SchemaFile { path: PathBuf, detail: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The header magic is not `MPS7`.
    #[error("not an MPS7 log: magic is {0:?}")]
    BadMagic(String),

    #[error("unknown record type {0}")]
    UnknownRecordType(u64),

    /// A decoded record lacks a field the report needs, or it has the wrong type.
    #[error("record field `{0}` is missing or has the wrong type")]
    MissingField(&'static str),
}
