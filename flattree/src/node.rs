//! Output nodes of a built tree

use crate::error::{Result, TreeError};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// A converted record placed in the tree.
///
/// A node carries every attribute copied from its source record plus two
/// synthesized ones: the label path from the root's child down to this node,
/// and the ordered children. Both live under the attribute names configured
/// on the builder, so a node serializes back into the caller's vocabulary:
///
/// ```
/// use flattree::TreeBuilder;
/// use serde_json::json;
///
/// let mut builder = TreeBuilder::new();
/// builder.add_value(json!({"id": 1, "pid": 0, "label": "A"}))?;
///
/// let tree = builder.build()?;
/// assert_eq!(
///     serde_json::to_value(&tree)?,
///     json!([{"id": 1, "pid": 0, "label": "A", "sub": [], "path": ["A"]}])
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Source attributes in source order. The children attribute is only a
    /// position marker here; its content is `children`.
    attributes: Map<String, Value>,
    children: Vec<Node>,
    children_key: String,
    path_key: String,
}

impl Node {
    /// Create a node from converted attributes.
    ///
    /// The children and path attributes are appended, in that order, when the
    /// source did not carry them.
    pub fn new(
        mut attributes: Map<String, Value>,
        children_key: impl Into<String>,
        path_key: impl Into<String>,
    ) -> Self {
        let children_key = children_key.into();
        let path_key = path_key.into();

        if !attributes.contains_key(&children_key) {
            attributes.insert(children_key.clone(), Value::Array(Vec::new()));
        }
        if !attributes.contains_key(&path_key) {
            attributes.insert(path_key.clone(), Value::Array(Vec::new()));
        }

        Self {
            attributes,
            children: Vec::new(),
            children_key,
            path_key,
        }
    }

    /// Value of an attribute. Children are reached through [`Node::children`].
    pub fn get(&self, name: &str) -> Option<&Value> {
        if name == self.children_key {
            return None;
        }
        self.attributes.get(name)
    }

    pub(crate) fn attribute(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| TreeError::not_found(name))
    }

    /// Overwrite an attribute the node already carries.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        if name == self.children_key {
            return Err(TreeError::not_settable(name));
        }
        match self.attributes.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(TreeError::not_settable(name)),
        }
    }

    /// Attributes other than the children, in source order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes
            .iter()
            .filter(|(key, _)| **key != self.children_key)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Labels from the root's child down to and including this node
    pub fn path(&self) -> &[Value] {
        match self.attributes.get(&self.path_key) {
            Some(Value::Array(path)) => path,
            _ => &[],
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn set_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    pub fn into_children(mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    /// Number of nodes in this subtree, this node included
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Convert into a plain JSON object, children nested under their attribute
    pub fn into_value(mut self) -> Value {
        let attributes = std::mem::take(&mut self.attributes);
        let mut children = Some(std::mem::take(&mut self.children));
        Value::Object(
            attributes
                .into_iter()
                .map(|(key, value)| {
                    if key == self.children_key {
                        let nested = children
                            .take()
                            .unwrap_or_default()
                            .into_iter()
                            .map(Node::into_value)
                            .collect();
                        (key, Value::Array(nested))
                    } else {
                        (key, value)
                    }
                })
                .collect(),
        )
    }
}

impl Drop for Node {
    /// Tears subtrees down iteratively so that very deep trees do not exhaust
    /// the stack.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (key, value) in &self.attributes {
            if *key == self.children_key {
                map.serialize_entry(key, &self.children)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}
