//! Loading records from files or stdin

use crate::error::{CliError, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Path that selects stdin
pub const STDIN_PATH: &str = "-";

/// Load records from `path`.
///
/// `.yaml`/`.yml` files are read as YAML, everything else (and stdin) as
/// JSON. The document is either a list of records or an object mapping ids to
/// records.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let document = if path == Path::new(STDIN_PATH) {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&content)?
    } else {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_document(path, &content)?
    };

    let records = records_from(document)?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_document(path: &Path, content: &str) -> Result<Value> {
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        Ok(serde_yaml_ng::from_str(content)?)
    } else {
        Ok(serde_json::from_str(content)?)
    }
}

/// Records held by a parsed document
pub fn records_from(document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(keyed) => Ok(keyed.into_iter().map(|(_, record)| record).collect()),
        Value::Null => Err(CliError::InvalidInput("null")),
        Value::Bool(_) => Err(CliError::InvalidInput("boolean")),
        Value::Number(_) => Err(CliError::InvalidInput("number")),
        Value::String(_) => Err(CliError::InvalidInput("string")),
    }
}
