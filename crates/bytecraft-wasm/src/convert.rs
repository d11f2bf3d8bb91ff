use bytecraft::{Parsed, Record};
use serde::Serialize;
use wasm_bindgen::JsValue;

/// Shape handed back to JavaScript: `{ data, offset }`.
#[derive(Serialize)]
struct ParsedOut<'a> {
    data: &'a Record,
    offset: usize,
}

pub fn error_to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Converts a parse result to a plain JS object.
///
/// Records become objects with keys in schema order, `Absent` becomes
/// `null`, and 64-bit integers become `BigInt` so user ids keep every digit.
pub fn parsed_to_js(parsed: &Parsed) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new()
        .serialize_large_number_types_as_bigints(true)
        .serialize_maps_as_objects(true);

    ParsedOut {
        data: &parsed.data,
        offset: parsed.offset,
    }
    .serialize(&serializer)
    .map_err(error_to_js)
}
