//! Errors surfaced by the `flattree` command

use flattree::TreeError;
use flattree_templating::TemplatingError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML input: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The input parsed but is neither a list nor a keyed object of records
    #[error("records must be a list or an object keyed by id, got {0}")]
    InvalidInput(&'static str),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Templating(#[from] TemplatingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_path() {
        let err = CliError::Read {
            path: PathBuf::from("records.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to read records.json: missing");
    }
}
