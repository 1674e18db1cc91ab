//! Error types for tree assembly
//!
//! Every failure is raised synchronously where it happens and propagates to the
//! caller of the top-level operation (`add`, `build`, ...). Nothing is retried.

use thiserror::Error;

/// Result type for flattree operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur while managing items or building a tree
#[derive(Debug, Error)]
pub enum TreeError {
    /// A scalar value was passed where a record was required
    #[error("items must be a mapping or an object, got {kind}")]
    InvalidItem { kind: &'static str },

    /// An attribute could not be resolved on a record
    #[error("the attribute '{attribute}' does not exist")]
    AttributeNotFound { attribute: String },

    /// An attribute could not be written on a record
    #[error("the attribute '{attribute}' could not be set")]
    AttributeNotSettable { attribute: String },

    /// A struct-shaped record could not be converted to or from its field map
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration sources could not be merged or extracted
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl TreeError {
    pub(crate) fn not_found(attribute: impl Into<String>) -> Self {
        Self::AttributeNotFound {
            attribute: attribute.into(),
        }
    }

    pub(crate) fn not_settable(attribute: impl Into<String>) -> Self {
        Self::AttributeNotSettable {
            attribute: attribute.into(),
        }
    }
}

impl From<figment::Error> for TreeError {
    fn from(error: figment::Error) -> Self {
        TreeError::Config(Box::new(error))
    }
}
