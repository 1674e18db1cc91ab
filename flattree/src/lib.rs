//! # flattree
//!
//! Turns a flat, unordered collection of records, each naming its parent by
//! identifier, into a sorted and nested tree ready for rendering or traversal.
//!
//! ## Modules
//!
//! - [`record`] - the three supported record shapes (mapping, struct, accessor)
//! - [`accessor`] - uniform attribute get/set across those shapes
//! - [`config`] - attribute roles and root identifier, with layered loading
//! - [`items`] - the keyed set of records a tree is built from
//! - [`builder`] - sorting and recursive grouping into [`Node`]s
//! - [`node`] - output nodes carrying their label path and children
//!
//! ## Example
//!
//! ```
//! use flattree::{TreeBuilder, TreeOptions};
//! use serde_json::json;
//!
//! let mut builder = TreeBuilder::new();
//! builder
//!     .configure(TreeOptions::new().sort_by("label"))
//!     .add_values([
//!         json!({"id": 1, "pid": 0, "label": "Shoes"}),
//!         json!({"id": 2, "pid": 0, "label": "Hats"}),
//!         json!({"id": 3, "pid": 1, "label": "Boots"}),
//!     ])?;
//!
//! let tree = builder.build()?;
//! assert_eq!(tree[0].get("label"), Some(&json!("Hats")));
//! assert_eq!(tree[1].children()[0].path(), &[json!("Shoes"), json!("Boots")]);
//! # Ok::<(), flattree::TreeError>(())
//! ```

pub mod accessor;
pub mod builder;
pub mod config;
pub mod error;
pub mod items;
pub mod logging;
pub mod node;
pub mod record;

pub use accessor::{accessor_method, stringify, AttributeAccessor};
pub use builder::TreeBuilder;
pub use config::{ConfigFormat, TreeConfig, TreeOptions, ENV_PREFIX};
pub use error::{Result, TreeError};
pub use items::{ItemRef, ItemSet};
pub use logging::Pretty;
pub use node::Node;
pub use record::{Accessors, Record, StructRecord};
