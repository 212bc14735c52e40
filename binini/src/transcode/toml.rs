//! TOML transcoding: render INI sections as a TOML document.
//!
//! Mapping:
//!   - implicit section   -> top-level keys
//!   - named section      -> table
//!   - Value::Bool        -> TOML boolean
//!   - Value::Integer     -> TOML integer
//!   - Value::Float       -> TOML float
//!   - Value::String      -> TOML string
//!
//! Lossy edges:
//!   - TOML has no null type; empty INI values cause an error.
//!   - Repeated section names merge into one table, last value wins.
//!   - A top-level key and a section with the same name cannot coexist.

use libini::{Section, Value};
use toml_edit::{DocumentMut, Item, Table};

/// Encode sections as a TOML string.
pub fn encode(sections: &[Section]) -> Result<String, String> {
    let mut doc = DocumentMut::new();

    for section in sections {
        if section.is_implicit() {
            for (key, value) in section {
                if doc.get(key).map_or(false, Item::is_table) {
                    return Err(format!("Top-level key {:?} clashes with a section", key));
                }
                doc.insert(key, toml_edit::value(value_to_toml(key, value)?));
            }
            continue;
        }

        let name = section.name();
        if !doc.contains_key(name) {
            doc.insert(name, Item::Table(Table::new()));
        }
        let table = doc
            .get_mut(name)
            .and_then(Item::as_table_mut)
            .ok_or_else(|| format!("Section [{}] clashes with a top-level key", name))?;
        for (key, value) in section {
            table.insert(key, toml_edit::value(value_to_toml(key, value)?));
        }
    }

    Ok(doc.to_string())
}

fn value_to_toml(key: &str, value: &Value) -> Result<toml_edit::Value, String> {
    match value {
        Value::Null => Err(format!("TOML has no null type (property {:?})", key)),
        Value::Bool(b) => Ok(toml_edit::Value::from(*b)),
        Value::Integer(n) => Ok(toml_edit::Value::from(*n)),
        Value::Float(f) => Ok(toml_edit::Value::from(*f)),
        Value::String(s) => Ok(toml_edit::Value::from(s.as_str())),
    }
}
