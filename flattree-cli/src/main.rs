//! `flattree` - build nested trees from flat parent-id records.
//!
//! Commands:
//! - `flattree build <input>`: print the tree as JSON or YAML
//! - `flattree render <template> <input>`: render the tree through a Liquid template
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use flattree_cli::{run, Cli};
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("flattree=debug,flattree_templating=debug,flattree_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(result_to_exit(run(&cli)));
}

/// Print the output and map the result to an exit code.
fn result_to_exit<E: std::fmt::Display>(result: Result<String, E>) -> i32 {
    match result {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
                eprintln!("Error: {}", e);
                return 1;
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
