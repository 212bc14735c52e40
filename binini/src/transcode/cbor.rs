//! CBOR transcoding: render INI sections as CBOR bytes.
//!
//! The document is an array of two-entry maps, `name` (text) and
//! `properties` (map in file order):
//!   - Value::Null        -> CBOR null
//!   - Value::Bool        -> CBOR true / false
//!   - Value::Integer     -> CBOR integer (major type 0 or 1)
//!   - Value::Float       -> CBOR float
//!   - Value::String      -> CBOR text string

use ciborium::value::{Integer, Value as CborValue};
use libini::{Section, Value};

/// Encode sections as CBOR bytes.
pub fn encode(sections: &[Section]) -> Result<Vec<u8>, String> {
    let doc = CborValue::Array(sections.iter().map(section_to_cbor).collect());
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&doc, &mut buf).map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

fn section_to_cbor(section: &Section) -> CborValue {
    let properties = section
        .iter()
        .map(|(key, value)| (CborValue::Text(key.clone()), value_to_cbor(value)))
        .collect();

    CborValue::Map(vec![
        (
            CborValue::Text("name".to_string()),
            CborValue::Text(section.name().to_string()),
        ),
        (
            CborValue::Text("properties".to_string()),
            CborValue::Map(properties),
        ),
    ])
}

fn value_to_cbor(value: &Value) -> CborValue {
    match value {
        Value::Null => CborValue::Null,
        Value::Bool(b) => CborValue::Bool(*b),
        Value::Integer(n) => CborValue::Integer(Integer::from(*n)),
        Value::Float(f) => CborValue::Float(*f),
        Value::String(s) => CborValue::Text(s.clone()),
    }
}
