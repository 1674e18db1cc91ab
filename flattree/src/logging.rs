//! YAML rendering of trees, options and records inside `tracing` events

use serde::Serialize;
use std::fmt::{self, Debug, Display, Formatter};

/// Shows a value as YAML when used in a log line.
///
/// Multi-line documents (a built tree, a configuration) start on a new line
/// so they line up under the event. Single-line documents stay inline. If the
/// value cannot be written as YAML its pretty `Debug` form is used.
///
/// ```
/// use flattree::{Pretty, TreeConfig};
///
/// let config = TreeConfig::default();
/// tracing::debug!("config: {}", Pretty(&config));
/// assert!(Pretty(&config).to_string().starts_with("\nroot: 0"));
/// assert_eq!(Pretty("Shoes").to_string(), "Shoes");
/// ```
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> Pretty<T> {
    fn write_yaml(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Ok(yaml) = serde_yaml_ng::to_string(&self.0) else {
            return write!(f, "\n{:#?}", self.0);
        };
        let body = yaml.trim_end();
        if body.contains('\n') {
            write!(f, "\n{body}")
        } else {
            f.write_str(body)
        }
    }
}

impl<T: Serialize + Debug> Display for Pretty<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_yaml(f)
    }
}

impl<T: Serialize + Debug> Debug for Pretty<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_yaml(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documents_start_on_new_line() {
        let value = json!({"id": 1, "label": "A"});
        let rendered = Pretty(&value).to_string();
        assert_eq!(rendered, "\nid: 1\nlabel: A");
    }

    #[test]
    fn test_scalars_stay_inline() {
        assert_eq!(Pretty(json!(7)).to_string(), "7");
        assert_eq!(format!("{:?}", Pretty(json!(true))), "true");
    }

    #[test]
    fn test_single_entry_map_stays_inline() {
        assert_eq!(Pretty(json!({"sortBy": "title"})).to_string(), "sortBy: title");
    }
}
