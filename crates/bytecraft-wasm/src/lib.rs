//! WASM bindings for the `bytecraft` binary schema engine.
//!
//! This crate exposes a compact API to JavaScript for parsing big-endian
//! binary payloads according to a JSON schema definition (see
//! `bytecraft::serde` for the accepted shape).
//!
//! At a high level you:
//! - **Describe your fields** in JSON: fixed-width `text`, `uint` and
//!   `double` fields, `when` fields that depend on an earlier sibling, and
//!   `repeated` sub-records bounded by a count field or the buffer end.
//! - **Compile** the schema once, and **parse** binary payloads many
//!   times from JavaScript.
//!
//! ```text
//! // Pseudo TypeScript example
//! //
//! // const schemaJson = JSON.stringify({
//! //   fields: [
//! //     { name: "count", type: "uint", width: 4 },
//! //     { name: "ids", type: "repeated", until: "count",
//! //       fields: [{ name: "id", type: "uint", width: 8 }] }
//! //   ]
//! // });
//! //
//! // const schema = new WasmSchema(schemaJson);
//! // const { data, offset } = schema.parse(someUint8Array);
//! // // data.ids[0].id is a BigInt
//! ```
//!
//! Errors are converted to `JsValue` strings carrying the error message.

mod convert;

use bytecraft::{Registry, Schema, serde::SchemaDef};
use wasm_bindgen::prelude::*;

/// Compiled schema that can be used from JavaScript to parse binary data.
#[wasm_bindgen]
pub struct WasmSchema {
    schema: Schema,
}

#[wasm_bindgen]
impl WasmSchema {
    /// Creates a new compiled schema from a JSON definition.
    ///
    /// Readers are resolved against the standard registry (text of width 4,
    /// uint of width 1, 2, 4 and 8, double).
    #[wasm_bindgen(constructor)]
    pub fn new(schema_json: &str) -> Result<WasmSchema, JsValue> {
        let def: SchemaDef = serde_json::from_str(schema_json).map_err(convert::error_to_js)?;
        let schema = def
            .compile(&Registry::standard())
            .map_err(convert::error_to_js)?;
        Ok(WasmSchema { schema })
    }

    /// Parses a payload from its first byte. Returns `{ data, offset }`.
    pub fn parse(&self, data: &[u8]) -> Result<JsValue, JsValue> {
        self.parse_at(data, 0)
    }

    /// Parses a payload starting at byte `offset`.
    #[wasm_bindgen(js_name = parseAt)]
    pub fn parse_at(&self, data: &[u8], offset: usize) -> Result<JsValue, JsValue> {
        let parsed = self
            .schema
            .parse_at(data, offset)
            .map_err(convert::error_to_js)?;
        convert::parsed_to_js(&parsed)
    }
}
