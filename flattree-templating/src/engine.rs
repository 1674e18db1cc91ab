//! Rendering a built tree through a Liquid template

use crate::error::{Result, TemplatingError};
use crate::partials::{
    DirectoryPartialLoader, MemoryPartialLoader, PartialLoader, PartialLoaderAdapter, PartialTag,
};
use crate::security::validate_template_security;
use flattree::{Node, Pretty, TreeBuilder};
use serde_json::{Map, Value};
use std::path::Path;

/// Name the tree is bound to in the template scope
pub const ITEMS_VARIABLE: &str = "items";

/// Renders trees into Liquid templates.
///
/// Templates are checked against [`validate_template_security`] before they are
/// parsed. Templates from the local filesystem are trusted by default; use
/// [`TreeTemplateEngine::untrusted`] for content from elsewhere.
#[derive(Debug, Clone)]
pub struct TreeTemplateEngine {
    trusted: bool,
}

impl TreeTemplateEngine {
    pub fn new() -> Self {
        Self { trusted: true }
    }

    /// Engine that applies the strict limits to every template
    pub fn untrusted() -> Self {
        Self { trusted: false }
    }

    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    /// Render the template at `template` with a tree and extra parameters.
    ///
    /// When `tree` is `None` the builder's items are built first. An empty tree
    /// renders as the empty string without evaluating the template. Partials
    /// are resolved from the directory holding the template.
    pub fn render(
        &self,
        builder: &TreeBuilder,
        template: &Path,
        tree: Option<&[Node]>,
        params: &Map<String, Value>,
    ) -> Result<String> {
        if !template.is_file() {
            return Err(TemplatingError::TemplateNotFound {
                path: template.to_path_buf(),
            });
        }

        let built;
        let tree = match tree {
            Some(tree) => tree,
            None => {
                built = builder.build()?;
                built.as_slice()
            }
        };

        if tree.is_empty() {
            tracing::debug!("Empty tree, skipping {}", template.display());
            return Ok(String::new());
        }

        let content = std::fs::read_to_string(template)?;
        tracing::debug!(
            "Rendering {} with {} top-level items",
            template.display(),
            tree.len()
        );
        self.render_with_loader(
            &content,
            tree,
            params,
            DirectoryPartialLoader::for_template(template),
        )
    }

    /// Render an in-memory template. Includes are not available.
    pub fn render_str(
        &self,
        template_str: &str,
        items: &[Node],
        params: &Map<String, Value>,
    ) -> Result<String> {
        self.render_with_loader(template_str, items, params, MemoryPartialLoader::empty())
    }

    /// Render an in-memory template whose includes come from `loader`.
    pub fn render_str_with_partials<T: PartialLoader + 'static>(
        &self,
        template_str: &str,
        items: &[Node],
        params: &Map<String, Value>,
        loader: T,
    ) -> Result<String> {
        self.render_with_loader(template_str, items, params, loader)
    }

    fn render_with_loader<T: PartialLoader + 'static>(
        &self,
        template_str: &str,
        items: &[Node],
        params: &Map<String, Value>,
        loader: T,
    ) -> Result<String> {
        validate_template_security(template_str, self.trusted)?;

        let parser = create_parser(loader)?;
        let template = parser
            .parse(template_str)
            .map_err(|e| TemplatingError::Parse(e.to_string()))?;

        let context = render_context(items, params)?;
        tracing::trace!("Template params: {}", Pretty(params));
        template
            .render(&context)
            .map_err(|e| TemplatingError::Render(e.to_string()))
    }
}

impl Default for TreeTemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Liquid scope holding every param, then the tree under `items`.
///
/// A param named `items` is shadowed by the tree.
pub fn render_context(items: &[Node], params: &Map<String, Value>) -> Result<liquid::Object> {
    let mut context = liquid::Object::new();
    for (key, value) in params {
        let value =
            liquid::model::to_value(value).map_err(|e| TemplatingError::Render(e.to_string()))?;
        context.insert(key.clone().into(), value);
    }
    let tree =
        liquid::model::to_value(&items).map_err(|e| TemplatingError::Render(e.to_string()))?;
    context.insert(ITEMS_VARIABLE.into(), tree);
    Ok(context)
}

fn create_parser<T: PartialLoader + 'static>(loader: T) -> Result<liquid::Parser> {
    let partials = liquid::partials::LazyCompiler::new(PartialLoaderAdapter::new(loader));
    liquid::ParserBuilder::with_stdlib()
        .tag(PartialTag::new())
        .partials(partials)
        .build()
        .map_err(|e| TemplatingError::Parse(e.to_string()))
}
