//! JSON-deserializable schema description.
//!
//! These types describe the *shape* of the binary data to be parsed. They are
//! intended to be constructed from JSON (for example a schema file shipped
//! with your application) and then compiled against a [Registry].
//!
//! ```json
//! { "fields": [
//!     { "name": "count", "type": "uint", "width": 4 },
//!     { "name": "items", "type": "repeated", "until": "count", "fields": [
//!         { "name": "kind", "type": "uint", "width": 1 },
//!         { "name": "amount", "type": "when", "field": "kind", "any_of": [0, 1],
//!           "read": { "type": "double" } }
//!     ] }
//! ] }
//! ```
//!
//! Decoded [Value]s and [Record]s serialize back out, with records as ordered
//! maps and [Value::Absent] as `null`.

use serde::{
    Deserialize, Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

use crate::{
    conditional::ConditionalReader,
    errors::SchemaError,
    field::Field,
    readers::{ReaderType, ScalarReader},
    registry::Registry,
    schema::Schema,
    value::{Record, Value},
};

/// Top-level schema definition consisting of a list of fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SchemaDef {
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FieldDef {
    /// Becomes the key in the decoded record.
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKindDef,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKindDef {
    Text {
        width: usize,
    },
    Uint {
        width: usize,
    },
    Double,
    /// Read with `read` only when sibling `field` holds one of `any_of`.
    When {
        field: String,
        any_of: Vec<u64>,
        read: ReaderDef,
    },
    Repeated {
        fields: Vec<FieldDef>,
        /// Earlier sibling holding the element count; repeats to the end of
        /// the buffer when missing.
        #[serde(default)]
        until: Option<String>,
    },
}

/// A scalar reader referenced by type and width.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReaderDef {
    Text { width: usize },
    Uint { width: usize },
    Double,
}

impl ReaderDef {
    /// Looks the reader up in `registry`.
    pub fn resolve(&self, registry: &Registry) -> Result<ScalarReader, SchemaError> {
        let (kind, width) = match self {
            ReaderDef::Text { width } => (ReaderType::Text, *width),
            ReaderDef::Uint { width } => (ReaderType::Uint, *width),
            ReaderDef::Double => (ReaderType::Double, 8),
        };

        registry
            .get(kind, width)
            .ok_or(SchemaError::UnknownReader { kind, width })
    }
}

impl FieldDef {
    pub fn to_field(&self, registry: &Registry) -> Result<Field, SchemaError> {
        let scalar = |def: ReaderDef| -> Result<Field, SchemaError> {
            Ok(Field::scalar(self.name.clone(), def.resolve(registry)?))
        };

        match &self.kind {
            FieldKindDef::Text { width } => scalar(ReaderDef::Text { width: *width }),
            FieldKindDef::Uint { width } => scalar(ReaderDef::Uint { width: *width }),
            FieldKindDef::Double => scalar(ReaderDef::Double),
            FieldKindDef::When {
                field,
                any_of,
                read,
            } => Ok(Field::conditional(
                self.name.clone(),
                ConditionalReader::when(field.clone(), any_of, read.resolve(registry)?),
            )),
            FieldKindDef::Repeated { fields, until } => Ok(Field::repeated(
                self.name.clone(),
                to_fields(fields, registry)?,
                until.as_deref(),
            )),
        }
    }
}

impl SchemaDef {
    /// Resolves readers through `registry` and compiles the result.
    pub fn compile(&self, registry: &Registry) -> Result<Schema, SchemaError> {
        Schema::compile(&to_fields(&self.fields, registry)?)
    }
}

fn to_fields(defs: &[FieldDef], registry: &Registry) -> Result<Vec<Field>, SchemaError> {
    defs.iter().map(|def| def.to_field(registry)).collect()
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::Absent => serializer.serialize_none(),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG_SCHEMA: &str = r#"{
        "fields": [
            { "name": "magicString", "type": "text", "width": 4 },
            { "name": "version", "type": "uint", "width": 1 },
            { "name": "recordCount", "type": "uint", "width": 4 },
            { "name": "records", "type": "repeated", "until": "recordCount", "fields": [
                { "name": "recordType", "type": "uint", "width": 1 },
                { "name": "timestamp", "type": "uint", "width": 4 },
                { "name": "userId", "type": "uint", "width": 8 },
                { "name": "dollarAmount", "type": "when", "field": "recordType",
                  "any_of": [0, 1], "read": { "type": "double" } }
            ] }
        ]
    }"#;

    #[test]
    fn test_schema_def_from_json() {
        let def: SchemaDef = serde_json::from_str(LOG_SCHEMA).unwrap();
        assert_eq!(def.fields.len(), 4);
        assert_eq!(def.fields[2].kind, FieldKindDef::Uint { width: 4 });

        let FieldKindDef::Repeated { fields, until } = &def.fields[3].kind else {
            panic!("expected repeated field");
        };
        assert_eq!(until.as_deref(), Some("recordCount"));
        assert_eq!(
            fields[3].kind,
            FieldKindDef::When {
                field: "recordType".to_string(),
                any_of: vec![0, 1],
                read: ReaderDef::Double,
            }
        );
    }

    #[test]
    fn test_json_schema_parses_and_serializes() {
        let def: SchemaDef = serde_json::from_str(LOG_SCHEMA).unwrap();
        let schema = def.compile(&Registry::standard()).unwrap();

        let mut data = b"MPS7\x01\x00\x00\x00\x02".to_vec();
        data.push(1);
        data.extend_from_slice(&5u32.to_be_bytes());
        data.extend_from_slice(&2456938384156277127u64.to_be_bytes());
        data.extend_from_slice(&5.0f64.to_be_bytes());
        data.push(2);
        data.extend_from_slice(&6u32.to_be_bytes());
        data.extend_from_slice(&2456938384156277127u64.to_be_bytes());

        let parsed = schema.parse(&data).unwrap();
        let json = serde_json::to_string(&parsed.data).unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"magicString":"MPS7","version":1,"recordCount":2,"records":["#,
                r#"{"recordType":1,"timestamp":5,"userId":2456938384156277127,"dollarAmount":5.0},"#,
                r#"{"recordType":2,"timestamp":6,"userId":2456938384156277127,"dollarAmount":null}]}"#
            )
        );
    }

    #[test]
    fn test_unknown_reader() {
        let def: SchemaDef =
            serde_json::from_str(r#"{ "fields": [ { "name": "x", "type": "uint", "width": 3 } ] }"#)
                .unwrap();

        assert_eq!(
            def.compile(&Registry::standard()).unwrap_err(),
            SchemaError::UnknownReader {
                kind: ReaderType::Uint,
                width: 3
            }
        );
    }

    #[test]
    fn test_custom_registry() {
        let def: SchemaDef =
            serde_json::from_str(r#"{ "fields": [ { "name": "x", "type": "uint", "width": 3 } ] }"#)
                .unwrap();
        let mut registry = Registry::standard();
        registry.register(ScalarReader::uint(3));

        let parsed = def.compile(&registry).unwrap().parse(&[0, 1, 0]).unwrap();
        assert_eq!(parsed.data.get("x"), Some(&Value::U32(256)));
    }
}
