//! Partial template loading
//!
//! Tree templates usually render one level with a loop and hand each child
//! list to a partial. Partials are looked up next to the main template, or
//! from an in-memory table when rendering a template string.

use crate::error::{Result, TemplatingError};
use liquid_core::{Language, ParseTag, Renderable, Runtime, TagReflection, TagTokenIter};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// File extensions tried when a partial is requested without one
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".liquid", ".html.liquid", ".html", ".md", ".txt"];

/// Source of partial template content
pub trait PartialLoader: Send + Sync + std::fmt::Debug {
    /// Check if a partial with the given name exists
    fn contains(&self, name: &str) -> bool;

    /// Names of all partials this loader can serve
    fn names(&self) -> Vec<String>;

    /// Load a partial by name
    fn try_get(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Load a partial by name, failing when it does not exist
    fn get(&self, name: &str) -> Result<String> {
        self.try_get(name)
            .map(Cow::into_owned)
            .ok_or_else(|| TemplatingError::Partial(format!("Partial '{name}' not found")))
    }
}

/// Candidate names for a requested partial, most specific first.
///
/// The exact name comes first, then the name with each known extension, then
/// the name with a known extension swapped for the others.
pub fn normalize_partial_name(requested_name: &str) -> Vec<String> {
    let mut candidates = vec![requested_name.to_string()];

    for ext in TEMPLATE_EXTENSIONS {
        candidates.push(format!("{requested_name}{ext}"));
    }

    for ext in TEMPLATE_EXTENSIONS {
        if let Some(stem) = requested_name.strip_suffix(ext) {
            candidates.push(stem.to_string());
            for other in TEMPLATE_EXTENSIONS.iter().filter(|other| *other != ext) {
                candidates.push(format!("{stem}{other}"));
            }
        }
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Loads partials from files under a root directory.
///
/// Names are relative paths; anything that would escape the root is treated
/// as missing.
#[derive(Debug, Clone)]
pub struct DirectoryPartialLoader {
    root: PathBuf,
}

impl DirectoryPartialLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loader rooted at the directory holding `template`
    pub fn for_template(template: &Path) -> Self {
        let root = template
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !contained {
            tracing::warn!("Refusing partial outside template directory: '{}'", name);
            return None;
        }
        let path = self.root.join(relative);
        path.is_file().then_some(path)
    }
}

impl PartialLoader for DirectoryPartialLoader {
    fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    fn names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    fn try_get(&self, name: &str) -> Option<Cow<'_, str>> {
        let path = self.resolve(name)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(Cow::Owned(content)),
            Err(error) => {
                tracing::warn!("Failed to read partial {}: {}", path.display(), error);
                None
            }
        }
    }
}

/// Partials held in memory, keyed by name
///
/// ```
/// use flattree_templating::{MemoryPartialLoader, PartialLoader};
///
/// let mut loader = MemoryPartialLoader::empty();
/// loader.add("item", "<li>{{ item.label }}</li>");
/// assert!(loader.contains("item"));
/// assert_eq!(loader.get("item").unwrap(), "<li>{{ item.label }}</li>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPartialLoader {
    partials: HashMap<String, String>,
}

impl MemoryPartialLoader {
    pub fn new(partials: HashMap<String, String>) -> Self {
        Self { partials }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.partials.insert(name.into(), content.into());
    }
}

impl PartialLoader for MemoryPartialLoader {
    fn contains(&self, name: &str) -> bool {
        self.partials.contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.partials.keys().cloned().collect();
        names.sort();
        names
    }

    fn try_get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.partials.get(name).map(|s| Cow::Borrowed(s.as_str()))
    }
}

/// Exposes a [`PartialLoader`] to liquid, trying every normalized name
#[derive(Debug)]
pub struct PartialLoaderAdapter<T: PartialLoader> {
    loader: T,
    names_cache: Vec<String>,
}

impl<T: PartialLoader> PartialLoaderAdapter<T> {
    pub fn new(loader: T) -> Self {
        let names_cache = loader.names();
        Self {
            loader,
            names_cache,
        }
    }

    pub fn loader(&self) -> &T {
        &self.loader
    }
}

impl<T: PartialLoader> liquid::partials::PartialSource for PartialLoaderAdapter<T> {
    fn contains(&self, name: &str) -> bool {
        normalize_partial_name(name)
            .iter()
            .any(|candidate| self.loader.contains(candidate))
    }

    fn names(&self) -> Vec<&str> {
        self.names_cache.iter().map(String::as_str).collect()
    }

    fn try_get(&self, name: &str) -> Option<Cow<'_, str>> {
        for candidate in normalize_partial_name(name) {
            if let Some(content) = self.loader.try_get(&candidate) {
                tracing::trace!("Loaded partial '{}' as '{}'", name, candidate);
                return Some(content);
            }
        }
        tracing::error!("No match found for partial '{}'", name);
        None
    }
}

/// `{% partial %}` marks a file as a partial and renders nothing
#[derive(Clone, Debug, Default)]
pub struct PartialTag;

impl PartialTag {
    pub fn new() -> Self {
        Self
    }
}

impl TagReflection for PartialTag {
    fn tag(&self) -> &'static str {
        "partial"
    }

    fn description(&self) -> &'static str {
        "Marks a file as a partial template (no-op)"
    }
}

impl ParseTag for PartialTag {
    fn parse(
        &self,
        mut arguments: TagTokenIter<'_>,
        _options: &Language,
    ) -> liquid_core::Result<Box<dyn Renderable>> {
        arguments.expect_nothing()?;
        Ok(Box::new(PartialRenderable))
    }

    fn reflection(&self) -> &dyn TagReflection {
        self
    }
}

#[derive(Debug, Clone)]
struct PartialRenderable;

impl Renderable for PartialRenderable {
    fn render_to(
        &self,
        _output: &mut dyn Write,
        _context: &dyn Runtime,
    ) -> liquid_core::Result<()> {
        Ok(())
    }
}
