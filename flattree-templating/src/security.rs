//! Limits applied to template content before it is parsed
//!
//! Trusted templates only get a generous size ceiling. Untrusted templates
//! are also checked for variable count and block nesting, since a tree
//! template is often recursive and a runaway one is expensive to render.

use crate::error::{Result, TemplatingError};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Maximum template size in bytes for untrusted templates
pub const MAX_TEMPLATE_SIZE: usize = 100_000;

/// Trusted templates may be this many times larger than untrusted ones
pub const TRUSTED_SIZE_FACTOR: usize = 10;

/// Maximum nesting of block tags in an untrusted template
pub const MAX_TEMPLATE_NESTING_DEPTH: usize = 10;

/// Maximum distinct variables in an untrusted template
pub const MAX_TEMPLATE_VARIABLES: usize = 1000;

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{-?\s*(\w+)").expect("variable pattern is valid"));

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%-?\s*(end)?(if|unless|for|case|capture|tablerow)\b")
        .expect("block pattern is valid")
});

/// Check template content against the size and complexity limits.
pub fn validate_template_security(template_content: &str, is_trusted: bool) -> Result<()> {
    if is_trusted {
        let limit = MAX_TEMPLATE_SIZE * TRUSTED_SIZE_FACTOR;
        if template_content.len() > limit {
            return Err(TemplatingError::Security(format!(
                "Template too large: {} bytes (max allowed for trusted: {limit})",
                template_content.len()
            )));
        }
        return Ok(());
    }

    if template_content.len() > MAX_TEMPLATE_SIZE {
        return Err(TemplatingError::Security(format!(
            "Template too large: {} bytes (max allowed: {MAX_TEMPLATE_SIZE})",
            template_content.len()
        )));
    }

    let variable_count = count_template_variables(template_content);
    if variable_count > MAX_TEMPLATE_VARIABLES {
        return Err(TemplatingError::Security(format!(
            "Too many template variables: {variable_count} (max allowed: {MAX_TEMPLATE_VARIABLES})"
        )));
    }

    let depth = template_nesting_depth(template_content);
    if depth > MAX_TEMPLATE_NESTING_DEPTH {
        return Err(TemplatingError::Security(format!(
            "Template nesting too deep: {depth} levels (max allowed: {MAX_TEMPLATE_NESTING_DEPTH})"
        )));
    }

    Ok(())
}

/// Number of distinct root variables referenced in output tags
fn count_template_variables(template: &str) -> usize {
    VARIABLE_RE
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect::<HashSet<_>>()
        .len()
}

/// Deepest nesting of block tags; unbalanced closers never go below zero
fn template_nesting_depth(template: &str) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;

    for cap in BLOCK_RE.captures_iter(template) {
        if cap.get(1).is_some() {
            depth = depth.saturating_sub(1);
        } else {
            depth += 1;
            max_depth = max_depth.max(depth);
        }
    }

    max_depth
}
