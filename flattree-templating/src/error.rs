//! Error types for tree rendering

use flattree::TreeError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for templating operations
pub type Result<T> = std::result::Result<T, TemplatingError>;

/// Errors that can occur while rendering a tree into a template
#[derive(Debug, Error)]
pub enum TemplatingError {
    /// The template locator does not resolve to a file
    #[error("the template '{}' could not be found", path.display())]
    TemplateNotFound { path: PathBuf },

    /// Template failed to parse
    #[error("template parse error: {0}")]
    Parse(String),

    /// Template failed to render
    #[error("template render error: {0}")]
    Render(String),

    /// Template exceeded the configured safety limits
    #[error("template security violation: {0}")]
    Security(String),

    /// A partial could not be resolved
    #[error("partial error: {0}")]
    Partial(String),

    /// Building the tree failed
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Reading the template failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
