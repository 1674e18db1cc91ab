//! Tree assembly
//!
//! [`TreeBuilder`] owns a set of records and turns it into a nested tree in
//! three steps:
//!
//! 1. Each record gets a composite sort key, `"{sort value}_{id}"`, and is
//!    converted into a [`Node`].
//! 2. Nodes are sorted by that key as plain strings. Records sharing a sort
//!    value are therefore ordered by the *text* of their ids: `"x_10"` sorts
//!    before `"x_2"`.
//! 3. Starting from the configured root, every level scans the remaining
//!    nodes in sort order and claims those whose parent is the level's id,
//!    recursing into each claimed node before moving on.
//!
//! Records whose parent chain never reaches the root are left out of the tree.

use crate::accessor::{stringify, AttributeAccessor};
use crate::config::{TreeConfig, TreeOptions};
use crate::error::Result;
use crate::items::{ItemRef, ItemSet};
use crate::logging::Pretty;
use crate::node::Node;
use crate::record::Record;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Builds sorted, nested trees from flat records that reference their parent.
///
/// ```
/// use flattree::TreeBuilder;
/// use serde_json::json;
///
/// let mut builder = TreeBuilder::new();
/// builder.add_values([
///     json!({"id": 1, "pid": 0, "label": "A"}),
///     json!({"id": 2, "pid": 1, "label": "B"}),
///     json!({"id": 3, "pid": 0, "label": "C"}),
/// ])?;
///
/// let tree = builder.build()?;
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree[0].children()[0].path(), &[json!("A"), json!("B")]);
/// assert_eq!(tree[1].path(), &[json!("C")]);
/// # Ok::<(), flattree::TreeError>(())
/// ```
///
/// The builder has no internal locking. Callers sharing one across threads
/// must synchronise `add`, `remove` and `build` themselves.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    config: TreeConfig,
    items: ItemSet,
}

impl TreeBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given configuration
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            items: ItemSet::new(),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply a partial configuration.
    ///
    /// Items already added stay keyed by the identifier attribute that was
    /// active when they were added.
    pub fn configure(&mut self, options: TreeOptions) -> &mut Self {
        trace!("Applying options: {}", Pretty(&options));
        self.config.apply(options);
        self
    }

    /// Restore the default configuration and drop all items
    pub fn reset(&mut self) -> &mut Self {
        self.config = TreeConfig::default();
        self.clear()
    }

    /// Drop all items
    pub fn clear(&mut self) -> &mut Self {
        self.items.clear();
        self
    }

    /// Add a record, keyed by its identifier attribute
    pub fn add(&mut self, record: impl Into<Record>) -> Result<&mut Self> {
        let record = record.into();
        let key = stringify(&record.get_attribute(&self.config.id)?);
        trace!(id = %key, shape = record.shape(), "Adding item");

        if self.items.insert(key, record).is_some() {
            trace!("Replaced an item with the same id");
        }
        Ok(self)
    }

    /// Add several records
    pub fn add_many<I>(&mut self, records: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Record>,
    {
        for record in records {
            self.add(record)?;
        }
        Ok(self)
    }

    /// Add a dynamic value; scalars fail with
    /// [`TreeError::InvalidItem`](crate::TreeError::InvalidItem)
    pub fn add_value(&mut self, value: Value) -> Result<&mut Self> {
        self.add(Record::from_value(value)?)
    }

    /// Add several dynamic values
    pub fn add_values<I>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Value>,
    {
        for value in values {
            self.add_value(value)?;
        }
        Ok(self)
    }

    /// Remove a record, given either the record or its identifier.
    ///
    /// Removing something that is not present does nothing.
    pub fn remove<'a>(&mut self, item: impl Into<ItemRef<'a>>) -> Result<&mut Self> {
        let key = match item.into() {
            ItemRef::Record(record) => stringify(&record.get_attribute(&self.config.id)?),
            ItemRef::Id(id) => stringify(&id),
        };

        if self.items.remove(&key).is_some() {
            trace!(id = %key, "Removed item");
        }
        Ok(self)
    }

    /// Remove several records or identifiers
    pub fn remove_many<'a, I>(&mut self, items: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<ItemRef<'a>>,
    {
        for item in items {
            self.remove(item)?;
        }
        Ok(self)
    }

    /// Remove by dynamic value: scalars are identifiers, anything else is
    /// read as a record.
    pub fn remove_value(&mut self, value: Value) -> Result<&mut Self> {
        match value {
            Value::Object(_) | Value::Array(_) => {
                let record = Record::from_value(value)?;
                self.remove(&record)
            }
            Value::Null => Err(crate::TreeError::InvalidItem { kind: "null" }),
            id => self.remove(id),
        }
    }

    /// Composite sort key of a record: its sort value, `_`, its item key
    pub fn sort_key(&self, key: &str, record: &Record) -> Result<String> {
        let sort_value = record.get_attribute(self.config.sort_attribute())?;
        Ok(format!("{}_{}", stringify(&sort_value), key))
    }

    /// Copy every attribute of a record into a fresh node.
    ///
    /// Fails with [`TreeError::AttributeNotFound`](crate::TreeError::AttributeNotFound)
    /// if an attribute the record declares cannot be read.
    pub fn convert(&self, record: &Record) -> Result<Node> {
        let attributes = record
            .attribute_names()
            .into_iter()
            .map(|name| record.get_attribute(&name).map(|value| (name, value)))
            .collect::<Result<Map<String, Value>>>()?;

        Ok(Node::new(
            attributes,
            self.config.children.as_str(),
            self.config.path.as_str(),
        ))
    }

    /// Build the tree.
    ///
    /// The item set is left untouched; every call works on fresh nodes, so
    /// building twice without changes in between gives equal trees.
    pub fn build(&self) -> Result<Vec<Node>> {
        let mut keyed = Vec::with_capacity(self.items.len());
        for (key, record) in self.items.iter() {
            keyed.push((self.sort_key(key, record)?, self.convert(record)?));
        }
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut pool: Vec<Option<Node>> = keyed.into_iter().map(|(_, node)| Some(node)).collect();
        let tree = self.build_level(&mut pool, &self.config.root, &[], true)?;

        let unplaced = pool.iter().filter(|slot| slot.is_some()).count();
        debug!(
            items = self.items.len(),
            roots = tree.len(),
            unplaced,
            "Built tree"
        );
        trace!("Tree: {}", Pretty(&tree));

        Ok(tree)
    }

    /// Claim, in pool order, every unclaimed node whose parent is `parent_id`
    /// (or null, on the outermost level), then do the same below each claimed
    /// node before the scan of its level moves on.
    ///
    /// Levels live on an explicit stack, so the depth of the tree is bounded
    /// by memory rather than by the thread's stack.
    fn build_level(
        &self,
        pool: &mut [Option<Node>],
        parent_id: &Value,
        prefix: &[Value],
        outermost: bool,
    ) -> Result<Vec<Node>> {
        let mut stack = vec![Level {
            parent_id: parent_id.clone(),
            prefix: prefix.to_vec(),
            scan: 0,
            outermost,
            owner: None,
            nodes: Vec::new(),
        }];

        loop {
            let Some(top) = stack.last_mut() else {
                return Ok(Vec::new());
            };

            match self.next_claim(pool, top)? {
                Some(index) => {
                    top.scan = index + 1;
                    let Some(mut node) = pool[index].take() else {
                        continue;
                    };

                    let id = node.attribute(&self.config.id)?.clone();
                    let mut path = top.prefix.clone();
                    path.push(node.attribute(&self.config.label)?.clone());
                    node.set(&self.config.path, Value::Array(path.clone()))?;

                    stack.push(Level {
                        parent_id: id,
                        prefix: path,
                        scan: 0,
                        outermost: false,
                        owner: Some(node),
                        nodes: Vec::new(),
                    });
                }
                None => {
                    let Some(finished) = stack.pop() else {
                        return Ok(Vec::new());
                    };
                    let Some(mut node) = finished.owner else {
                        return Ok(finished.nodes);
                    };

                    trace!(
                        id = %stringify(&finished.parent_id),
                        depth = finished.prefix.len(),
                        children = finished.nodes.len(),
                        "Placed node"
                    );
                    node.set_children(finished.nodes);
                    match stack.last_mut() {
                        Some(parent) => parent.nodes.push(node),
                        None => return Ok(vec![node]),
                    }
                }
            }
        }
    }

    /// Index of the next unclaimed node at or after `level.scan` that
    /// belongs to `level`
    fn next_claim(&self, pool: &[Option<Node>], level: &Level) -> Result<Option<usize>> {
        for (index, slot) in pool.iter().enumerate().skip(level.scan) {
            let Some(node) = slot else {
                continue;
            };
            let parent = node.attribute(&self.config.parent)?;
            if (level.outermost && parent.is_null()) || *parent == level.parent_id {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}

/// One level of the tree under construction
struct Level {
    parent_id: Value,
    prefix: Vec<Value>,
    /// Next pool index to look at
    scan: usize,
    outermost: bool,
    /// Node whose children this level collects; `None` for the top level
    owner: Option<Node>,
    nodes: Vec<Node>,
}
