//! # bytecraft
//!
//! A library for schema-driven parsing of big-endian binary data.
//!
//! Describe a record as ordered named fields (fixed-width scalars, values
//! conditioned on earlier siblings, or repeated sub-records bounded by a
//! count field or by the end of the buffer), compile it once into a
//! [Schema], then parse any number of byte slices into [Record]s.
//!
//! ## Example
//!
//! ```
//! use bytecraft::conditional::ConditionalReader;
//! use bytecraft::field::Field;
//! use bytecraft::readers::ScalarReader;
//! use bytecraft::{Schema, Value};
//!
//! let entry = vec![
//!     Field::scalar("kind", ScalarReader::uint(1)),
//!     Field::conditional(
//!         "amount",
//!         ConditionalReader::when("kind", &[0, 1], ScalarReader::double()),
//!     ),
//! ];
//! let schema = Schema::compile(&[
//!     Field::scalar("count", ScalarReader::uint(1)),
//!     Field::repeated("entries", entry, Some("count")),
//! ])
//! .unwrap();
//!
//! let parsed = schema.parse(&[1, 2]).unwrap();
//! let entries = parsed.data.get("entries").and_then(Value::as_list).unwrap();
//! assert_eq!(entries[0].get("amount"), Some(&Value::Absent));
//! assert_eq!(parsed.offset, 2);
//! ```

pub mod bytes;
pub mod compiled;
pub mod conditional;
pub mod errors;
pub mod executor;
pub mod field;
pub mod readers;
pub mod registry;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use errors::{ParseError, ReadError, SchemaError};
pub use registry::Registry;
pub use schema::Schema;
pub use value::{Parsed, Record, Value};
