//! Builder configuration
//!
//! A [`TreeConfig`] names the attributes that play each role in a record
//! (identifier, parent reference, label, ...) and the identifier treated as the
//! root. It can be built in code, updated with partial [`TreeOptions`], or
//! loaded with figment from layered sources:
//!
//! 1. Default values (lowest precedence)
//! 2. A configuration file (TOML, YAML or JSON, by extension)
//! 3. Environment variables with the `FLATTREE_` prefix (highest precedence)
//!
//! ```yaml
//! root: 0
//! parent: parent_id
//! sortBy: title
//! ```

use crate::error::Result;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, trace};

/// Prefix of environment variables read by [`TreeConfig::figment`]
pub const ENV_PREFIX: &str = "FLATTREE_";

/// Attribute roles and the root identifier used by a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Identifier value treated as "no parent"
    pub root: Value,
    /// Attribute holding a record's identifier
    pub id: String,
    /// Attribute holding the parent's identifier
    pub parent: String,
    /// Attribute the label path is written to
    pub path: String,
    /// Attribute whose value is appended to the path
    pub label: String,
    /// Attribute the children are written to
    pub children: String,
    /// Attribute sorted on; the identifier attribute when unset
    #[serde(alias = "sortBy", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root: Value::from(0),
            id: "id".to_string(),
            parent: "pid".to_string(),
            path: "path".to_string(),
            label: "label".to_string(),
            children: "sub".to_string(),
            sort_by: None,
        }
    }
}

impl TreeConfig {
    /// Attribute the build sorts on
    pub fn sort_attribute(&self) -> &str {
        self.sort_by.as_deref().unwrap_or(&self.id)
    }

    /// Apply a partial update; unset options leave the current value alone.
    pub fn apply(&mut self, options: TreeOptions) {
        let TreeOptions {
            root,
            id,
            parent,
            path,
            label,
            children,
            sort_by,
        } = options;

        if let Some(root) = root {
            self.root = root;
        }
        if let Some(id) = id {
            self.id = id;
        }
        if let Some(parent) = parent {
            self.parent = parent;
        }
        if let Some(path) = path {
            self.path = path;
        }
        if let Some(label) = label {
            self.label = label;
        }
        if let Some(children) = children {
            self.children = children;
        }
        if sort_by.is_some() {
            self.sort_by = sort_by;
        }
    }

    /// Layered configuration sources: defaults, then `path` if given, then
    /// `FLATTREE_*` environment variables.
    ///
    /// A file that does not exist contributes nothing.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(TreeConfig::default()));

        if let Some(path) = path {
            let format = ConfigFormat::from_path(path);
            trace!("Merging config file: {} ({:?})", path.display(), format);
            figment = match format {
                ConfigFormat::Toml => figment.merge(Toml::file(path)),
                ConfigFormat::Yaml => figment.merge(Yaml::file(path)),
                ConfigFormat::Json => figment.merge(Json::file(path)),
            };
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration from all sources
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: TreeConfig = Self::figment(path).extract()?;
        debug!(
            id = %config.id,
            parent = %config.parent,
            sort_by = %config.sort_attribute(),
            "Loaded tree configuration"
        );
        Ok(config)
    }
}

/// Partial configuration update.
///
/// Deserializes from any map of options; keys other than the recognised
/// roles are ignored.
///
/// ```
/// use flattree::TreeOptions;
/// use serde_json::json;
///
/// let options: TreeOptions =
///     serde_json::from_value(json!({"parent": "parent_id", "sortBy": "title", "colour": "red"}))?;
/// assert_eq!(options.parent.as_deref(), Some("parent_id"));
/// assert_eq!(options.sort_by.as_deref(), Some("title"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeOptions {
    /// `Some(Value::Null)` when the source sets the root to null explicitly
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub root: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
    #[serde(default, alias = "sortBy", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

impl TreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: impl Into<Value>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn children(mut self, children: impl Into<String>) -> Self {
        self.children = Some(children.into());
        self
    }

    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    /// True when no option is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A key that is present always yields `Some`, even when its value is null.
/// Absent keys fall back to `#[serde(default)]`.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Configuration file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Format for a path; anything unrecognised is read as TOML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TreeConfig::default();
        assert_eq!(config.root, json!(0));
        assert_eq!(config.id, "id");
        assert_eq!(config.parent, "pid");
        assert_eq!(config.path, "path");
        assert_eq!(config.label, "label");
        assert_eq!(config.children, "sub");
        assert_eq!(config.sort_attribute(), "id");
    }

    #[test]
    fn test_sort_attribute_follows_id() {
        let mut config = TreeConfig::default();
        config.apply(TreeOptions::new().id("key"));
        assert_eq!(config.sort_attribute(), "key");

        config.apply(TreeOptions::new().sort_by("title"));
        assert_eq!(config.sort_attribute(), "title");
    }

    #[test]
    fn test_apply_is_partial() {
        let mut config = TreeConfig::default();
        config.apply(TreeOptions::new().root("top").children("nodes"));

        assert_eq!(config.root, json!("top"));
        assert_eq!(config.children, "nodes");
        assert_eq!(config.parent, "pid");
        assert_eq!(config.label, "label");
    }

    #[test]
    fn test_options_ignore_unknown_keys() {
        let options: TreeOptions =
            serde_json::from_value(json!({"label": "name", "unknown": true})).unwrap();
        assert_eq!(options, TreeOptions::new().label("name"));
        assert!(!options.is_empty());
        assert!(TreeOptions::new().is_empty());
    }

    #[test]
    fn test_options_keep_explicit_null_root() {
        let options: TreeOptions = serde_json::from_value(json!({"root": null})).unwrap();
        assert_eq!(options.root, Some(Value::Null));
        assert!(!options.is_empty());

        let mut config = TreeConfig::default();
        config.apply(options);
        assert_eq!(config.root, Value::Null);

        let absent: TreeOptions = serde_json::from_value(json!({"label": "name"})).unwrap();
        assert_eq!(absent.root, None);
        config.apply(absent);
        assert_eq!(config.root, Value::Null);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Toml);
    }

    #[test]
    #[serial]
    fn test_load_defaults_without_file() {
        let config = TreeConfig::load(None).unwrap();
        assert_eq!(config, TreeConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_yaml_file_with_camel_case_sort_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.yaml");
        fs::write(&path, "parent: parent_id\nsortBy: title\nroot: 5\n").unwrap();

        let config = TreeConfig::load(Some(&path)).unwrap();
        assert_eq!(config.parent, "parent_id");
        assert_eq!(config.sort_attribute(), "title");
        assert_eq!(config.root, json!(5));
        assert_eq!(config.id, "id");
    }

    #[test]
    #[serial]
    fn test_load_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.toml");
        fs::write(&path, "label = \"name\"\nchildren = \"nodes\"\n").unwrap();

        let config = TreeConfig::load(Some(&path)).unwrap();
        assert_eq!(config.label, "name");
        assert_eq!(config.children, "nodes");
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, r#"{"label": "name", "parent": "up"}"#).unwrap();

        std::env::set_var("FLATTREE_LABEL", "title");
        let result = TreeConfig::load(Some(&path));
        std::env::remove_var("FLATTREE_LABEL");

        let config = result.unwrap();
        assert_eq!(config.label, "title");
        assert_eq!(config.parent, "up");
    }

    #[test]
    #[serial]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, "{ not json").unwrap();

        let result = TreeConfig::load(Some(&path));
        assert!(matches!(result, Err(crate::TreeError::Config(_))));
    }
}
