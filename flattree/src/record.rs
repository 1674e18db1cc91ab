//! Input record shapes
//!
//! A record enters the builder in one of three shapes, fixed when the record
//! is constructed rather than probed on every attribute access:
//!
//! - [`Record::Map`] - a key/value mapping
//! - [`Record::Struct`] - a struct with named public fields, captured through serde
//! - [`Record::Accessor`] - an opaque value reachable only through `get<Attr>` /
//!   `set<Attr>` style accessors
//!
//! Attribute access across all three goes through
//! [`AttributeAccessor`](crate::accessor::AttributeAccessor).

use crate::error::{Result, TreeError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Capability of an opaque record that only exposes accessor methods.
///
/// Method names follow the `get<Attr>` / `set<Attr>` convention, with the first
/// character of the attribute upper-cased (`label` is read through `getLabel`).
/// See [`accessor_method`](crate::accessor::accessor_method).
///
/// ```
/// use flattree::{Accessors, AttributeAccessor, Record};
/// use serde_json::{json, Value};
///
/// #[derive(Debug)]
/// struct Page {
///     id: u64,
///     title: String,
/// }
///
/// impl Accessors for Page {
///     fn properties(&self) -> Vec<String> {
///         vec!["id".into(), "title".into()]
///     }
///
///     fn call_getter(&self, method: &str) -> Option<Value> {
///         match method {
///             "getId" => Some(json!(self.id)),
///             "getTitle" => Some(json!(self.title)),
///             _ => None,
///         }
///     }
///
///     fn call_setter(&mut self, method: &str, value: Value) -> bool {
///         match (method, value) {
///             ("setTitle", Value::String(title)) => {
///                 self.title = title;
///                 true
///             }
///             _ => false,
///         }
///     }
/// }
///
/// let record = Record::accessor(Page { id: 7, title: "Home".into() });
/// assert_eq!(record.get_attribute("title").unwrap(), json!("Home"));
/// ```
pub trait Accessors: std::fmt::Debug + Send {
    /// Every attribute the value holds, in a stable order.
    ///
    /// Conversion reads each of these through its getter, so a property
    /// without a getter makes conversion fail.
    fn properties(&self) -> Vec<String>;

    /// Invoke a `get<Attr>` accessor, `None` if the value has no such method.
    fn call_getter(&self, method: &str) -> Option<Value>;

    /// Invoke a `set<Attr>` accessor, `false` if the value has no such method.
    fn call_setter(&mut self, method: &str, value: Value) -> bool;
}

/// A struct-shaped record: the public fields of a serializable value.
///
/// The declared field list is whatever serde emits for the type, so it is
/// known at compile time through `#[derive(Serialize)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructRecord {
    type_name: &'static str,
    fields: Map<String, Value>,
}

impl StructRecord {
    /// Capture the public fields of `value`.
    ///
    /// Fails with [`TreeError::InvalidItem`] when the type does not serialize
    /// to a struct-like map (a newtype around a number, for example).
    pub fn new<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(fields) => Ok(Self {
                type_name: std::any::type_name::<T>(),
                fields,
            }),
            other => Err(TreeError::InvalidItem {
                kind: kind_of(&other),
            }),
        }
    }

    /// Name of the Rust type the fields were captured from
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Value of a declared field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Rebuild the typed value, picking up any field written through `set`.
    pub fn into_inner<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields))?)
    }
}

/// A record of one of the supported shapes
#[derive(Debug)]
pub enum Record {
    /// Key/value mapping
    Map(Map<String, Value>),
    /// Struct with named public fields
    Struct(StructRecord),
    /// Opaque value with accessor methods
    Accessor(Box<dyn Accessors>),
}

impl Record {
    /// Wrap a key/value mapping
    pub fn map(map: Map<String, Value>) -> Self {
        Record::Map(map)
    }

    /// Capture the public fields of a serializable struct
    pub fn from_struct<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Record::Struct(StructRecord::new(value)?))
    }

    /// Wrap an opaque value that exposes accessor methods
    pub fn accessor<A: Accessors + 'static>(value: A) -> Self {
        Record::Accessor(Box::new(value))
    }

    /// Convert a dynamic value into a mapping record.
    ///
    /// Objects are taken as they are and arrays are keyed by element index.
    /// Scalars (null, booleans, numbers, strings) fail with
    /// [`TreeError::InvalidItem`].
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Record::Map(map)),
            Value::Array(elements) => Ok(Record::Map(
                elements
                    .into_iter()
                    .enumerate()
                    .map(|(index, element)| (index.to_string(), element))
                    .collect(),
            )),
            scalar => Err(TreeError::InvalidItem {
                kind: kind_of(&scalar),
            }),
        }
    }

    /// Short name of the shape, for log output
    pub fn shape(&self) -> &'static str {
        match self {
            Record::Map(_) => "map",
            Record::Struct(_) => "struct",
            Record::Accessor(_) => "accessor",
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record::Map(map)
    }
}

impl From<StructRecord> for Record {
    fn from(record: StructRecord) -> Self {
        Record::Struct(record)
    }
}

impl From<Box<dyn Accessors>> for Record {
    fn from(value: Box<dyn Accessors>) -> Self {
        Record::Accessor(value)
    }
}

impl TryFrom<Value> for Record {
    type Error = TreeError;

    fn try_from(value: Value) -> Result<Self> {
        Record::from_value(value)
    }
}

/// JSON kind of a value, as used in error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
