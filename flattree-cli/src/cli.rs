//! Command-line definition for `flattree`
//!
//! Only depends on `clap`, `serde_json` and the core crate's option type.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use flattree::TreeOptions;
use serde_json::Value;

/// Output format of the `build` command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// Build nested trees from flat parent-id records
#[derive(Parser, Debug)]
#[command(name = "flattree")]
#[command(version)]
#[command(about = "Build nested trees from flat parent-id records")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the tree and print it
    Build {
        /// Records file (JSON or YAML), or `-` for JSON on stdin
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// Build the tree and render it through a Liquid template
    Render {
        /// Template file; partials are looked up beside it
        template: PathBuf,

        /// Records file (JSON or YAML), or `-` for JSON on stdin
        input: PathBuf,

        /// Extra template variable as KEY=VALUE; VALUE is parsed as JSON when possible
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, Value)>,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },
}

/// Command-line overrides of the tree configuration
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Identifier treated as the root (parsed as JSON when possible)
    #[arg(long, value_parser = parse_json_or_string)]
    pub root: Option<Value>,

    /// Identifier attribute
    #[arg(long)]
    pub id: Option<String>,

    /// Parent reference attribute
    #[arg(long)]
    pub parent: Option<String>,

    /// Attribute the label path is written to
    #[arg(long)]
    pub path: Option<String>,

    /// Label attribute
    #[arg(long)]
    pub label: Option<String>,

    /// Attribute the children are written to
    #[arg(long)]
    pub children: Option<String>,

    /// Attribute to sort siblings on
    #[arg(long)]
    pub sort_by: Option<String>,
}

impl ConfigOverrides {
    pub fn to_options(&self) -> TreeOptions {
        TreeOptions {
            root: self.root.clone(),
            id: self.id.clone(),
            parent: self.parent.clone(),
            path: self.path.clone(),
            label: self.label.clone(),
            children: self.children.clone(),
            sort_by: self.sort_by.clone(),
        }
    }
}

fn parse_json_or_string(raw: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// Parse `KEY=VALUE`; the value is JSON when it parses, otherwise a string.
pub fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter '{raw}': expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid parameter '{raw}': empty key"));
    }
    Ok((key.to_string(), parse_json_or_string(value)?))
}
