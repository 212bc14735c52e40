//! Sections: a name plus its properties in file order.

use indexmap::IndexMap;

use crate::value::Value;

/// A named block of properties.
///
/// The implicit section formed by properties before the first header has
/// an empty name. Properties iterate in the order their keys first
/// appeared; a repeated key keeps its position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    name: String,
    properties: IndexMap<String, Value>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for the unnamed section before any header.
    pub fn is_implicit(&self) -> bool {
        self.name.is_empty()
    }

    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.properties.iter()
    }

    pub fn into_properties(self) -> IndexMap<String, Value> {
        self.properties
    }

    /// Set `key` to `value`, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
