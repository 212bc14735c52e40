//! YAML transcoding: render INI sections as YAML text.
//!
//! The document is a sequence, so repeated and unnamed sections survive:
//!   - Section            -> mapping with `name` and `properties`
//!   - properties         -> mapping in file order
//!   - Value::Null        -> YAML null
//!   - Value::Bool        -> YAML bool
//!   - Value::Integer     -> YAML integer
//!   - Value::Float       -> YAML float
//!   - Value::String      -> YAML string

use libini::{Section, Value};
use serde_yaml::{Mapping, Number};

/// Encode sections as a YAML string.
pub fn encode(sections: &[Section]) -> Result<String, String> {
    let doc = serde_yaml::Value::Sequence(sections.iter().map(section_to_yaml).collect());
    serde_yaml::to_string(&doc).map_err(|e| format!("YAML encode error: {}", e))
}

fn section_to_yaml(section: &Section) -> serde_yaml::Value {
    let mut properties = Mapping::new();
    for (key, value) in section {
        properties.insert(serde_yaml::Value::String(key.clone()), value_to_yaml(value));
    }

    let mut map = Mapping::new();
    map.insert(
        serde_yaml::Value::String("name".to_string()),
        serde_yaml::Value::String(section.name().to_string()),
    );
    map.insert(
        serde_yaml::Value::String("properties".to_string()),
        serde_yaml::Value::Mapping(properties),
    );
    serde_yaml::Value::Mapping(map)
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Integer(n) => serde_yaml::Value::Number(Number::from(*n)),
        Value::Float(f) => serde_yaml::Value::Number(Number::from(*f)),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
    }
}
