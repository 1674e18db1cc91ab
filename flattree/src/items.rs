//! The set of records a tree is built from

use crate::record::Record;
use indexmap::IndexMap;
use serde_json::Value;

/// Records keyed by the canonical text of their identifier.
///
/// Insertion order is kept. Adding a record whose identifier is already
/// present replaces the earlier record.
#[derive(Debug, Default)]
pub struct ItemSet {
    items: IndexMap<String, Record>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced
    pub fn insert(&mut self, key: String, record: Record) -> Option<Record> {
        self.items.insert(key, record)
    }

    /// Remove a record, keeping the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<Record> {
        self.items.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.items.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.items.iter().map(|(key, record)| (key.as_str(), record))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// What a removal targets: a record, whose identifier is read from it, or a
/// bare identifier.
#[derive(Debug)]
pub enum ItemRef<'a> {
    Record(&'a Record),
    Id(Value),
}

impl<'a> From<&'a Record> for ItemRef<'a> {
    fn from(record: &'a Record) -> Self {
        ItemRef::Record(record)
    }
}

impl From<Value> for ItemRef<'_> {
    fn from(id: Value) -> Self {
        ItemRef::Id(id)
    }
}

impl From<&str> for ItemRef<'_> {
    fn from(id: &str) -> Self {
        ItemRef::Id(Value::from(id))
    }
}

impl From<String> for ItemRef<'_> {
    fn from(id: String) -> Self {
        ItemRef::Id(Value::from(id))
    }
}

macro_rules! item_ref_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ItemRef<'_> {
                fn from(id: $ty) -> Self {
                    ItemRef::Id(Value::from(id))
                }
            }
        )*
    };
}

item_ref_from_number!(i32, i64, u32, u64, usize);
