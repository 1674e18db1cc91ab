//! Library side of the `flattree` command.
//!
//! Configuration is layered as defaults, then the `--config` file, then
//! `FLATTREE_*` environment variables, then command-line overrides.

pub mod cli;
pub mod error;
pub mod input;

pub use cli::{Cli, Commands, ConfigOverrides, OutputFormat};
pub use error::{CliError, Result};

use flattree::{TreeBuilder, TreeConfig};
use flattree_templating::TreeTemplateEngine;
use serde_json::Map;
use std::path::Path;

/// Run a parsed command line and return what should be printed on stdout.
pub fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Commands::Build {
            input,
            format,
            overrides,
        } => {
            let builder = load_builder(cli.config.as_deref(), overrides, input)?;
            let tree = builder.build()?;
            tracing::info!("Built {} top-level nodes", tree.len());
            match format {
                OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&tree)?)),
                OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(&tree)?),
            }
        }
        Commands::Render {
            template,
            input,
            params,
            overrides,
        } => {
            let builder = load_builder(cli.config.as_deref(), overrides, input)?;
            let params: Map<_, _> = params.iter().cloned().collect();
            Ok(TreeTemplateEngine::new().render(&builder, template, None, &params)?)
        }
    }
}

/// Builder holding the input records under the fully layered configuration
pub fn load_builder(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    input: &Path,
) -> Result<TreeBuilder> {
    let mut config = TreeConfig::load(config_path)?;
    config.apply(overrides.to_options());

    let mut builder = TreeBuilder::with_config(config);
    builder.add_values(input::load_records(input)?)?;
    Ok(builder)
}
