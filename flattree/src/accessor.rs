//! Uniform attribute access across record shapes

use crate::error::{Result, TreeError};
use crate::record::Record;
use serde_json::Value;

/// Read and write named attributes regardless of the record's shape.
///
/// Resolution per shape:
///
/// | Shape | `get` | `set` |
/// |---|---|---|
/// | mapping | value at the key | key must already be present |
/// | struct | declared field | field must be declared |
/// | accessor | `get<Attr>()` | `set<Attr>(value)` |
pub trait AttributeAccessor {
    /// Read an attribute, failing with [`TreeError::AttributeNotFound`]
    fn get_attribute(&self, name: &str) -> Result<Value>;

    /// Write an attribute in place, failing with [`TreeError::AttributeNotSettable`]
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()>;

    /// Every attribute name reachable on this record
    fn attribute_names(&self) -> Vec<String>;
}

impl AttributeAccessor for Record {
    fn get_attribute(&self, name: &str) -> Result<Value> {
        let value = match self {
            Record::Map(map) => map.get(name).cloned(),
            Record::Struct(record) => record.field(name).cloned(),
            Record::Accessor(accessors) => accessors.call_getter(&accessor_method("get", name)),
        };
        value.ok_or_else(|| TreeError::not_found(name))
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        let written = match self {
            Record::Map(map) => match map.get_mut(name) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            },
            Record::Struct(record) => match record.field_mut(name) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            },
            Record::Accessor(accessors) => {
                accessors.call_setter(&accessor_method("set", name), value)
            }
        };

        if written {
            Ok(())
        } else {
            Err(TreeError::not_settable(name))
        }
    }

    fn attribute_names(&self) -> Vec<String> {
        match self {
            Record::Map(map) => map.keys().cloned().collect(),
            Record::Struct(record) => record.field_names().map(String::from).collect(),
            Record::Accessor(accessors) => accessors.properties(),
        }
    }
}

/// Accessor method name for an attribute: `prefix` followed by the attribute
/// with its first character upper-cased.
///
/// ```
/// use flattree::accessor_method;
///
/// assert_eq!(accessor_method("get", "label"), "getLabel");
/// assert_eq!(accessor_method("set", "parentId"), "setParentId");
/// ```
pub fn accessor_method(prefix: &str, attribute: &str) -> String {
    let mut chars = attribute.chars();
    match chars.next() {
        Some(first) => format!("{prefix}{}{}", first.to_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}

/// Canonical textual form of a value.
///
/// Strings are taken verbatim, numbers and booleans use their `Display`,
/// null is the empty string and arrays or objects become compact JSON.
/// Sort keys and item keys are both built from this form.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        composite => composite.to_string(),
    }
}
