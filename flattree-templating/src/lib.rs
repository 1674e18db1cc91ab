//! # flattree-templating
//!
//! Renders trees built by [`flattree`] through Liquid templates. The tree is
//! bound as `items`, next to any caller-supplied parameters, and templates may
//! include partials stored beside them.
//!
//! ```
//! use flattree::TreeBuilder;
//! use flattree_templating::TreeTemplateEngine;
//! use serde_json::{json, Map};
//!
//! let mut builder = TreeBuilder::new();
//! builder.add_value(json!({"id": 1, "pid": 0, "label": "Home"}))?;
//! let tree = builder.build()?;
//!
//! let html = TreeTemplateEngine::new().render_str(
//!     "<ul>{% for item in items %}<li>{{ item.label }}</li>{% endfor %}</ul>",
//!     &tree,
//!     &Map::new(),
//! )?;
//! assert_eq!(html, "<ul><li>Home</li></ul>");
//! # Ok::<(), flattree_templating::TemplatingError>(())
//! ```

pub mod engine;
pub mod error;
pub mod partials;
pub mod security;

pub use engine::{render_context, TreeTemplateEngine, ITEMS_VARIABLE};
pub use error::{Result, TemplatingError};
pub use partials::{
    normalize_partial_name, DirectoryPartialLoader, MemoryPartialLoader, PartialLoader,
    PartialLoaderAdapter, PartialTag, TEMPLATE_EXTENSIONS,
};
pub use security::validate_template_security;
