//! Itemflow CLI - run an item pipeline to its fixpoint.
//!
//! Loads one location, applies the standard decode-image, decompress and
//! parse-json actions until none applies, and prints a JSON report of the
//! final item to stdout.
//!
//! # Usage
//!
//! ```bash
//! # Run a file through the pipeline
//! itemflow run file://test.json
//!
//! # Resolve against the bundle directory, with a step ceiling
//! itemflow run bundle://assets/archive.zip --max-steps 8
//!
//! # View configuration
//! itemflow config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Itemflow - run-to-fixpoint item pipeline.
#[derive(Parser, Debug)]
#[command(name = "itemflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "ITEMFLOW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a location and run the standard actions to a fixpoint
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // An explicit --config must load, unless the config command is about to
    // create it. The default location falls back to defaults.
    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(itemflow_core::Config::default_path);
    let config = match &cli.config {
        Some(path) if path.exists() || !matches!(cli.command, Commands::Config(_)) => {
            itemflow_core::Config::load_from(path)?
        }
        Some(_) => itemflow_core::Config::default(),
        None => match itemflow_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `itemflow config path`."
                );
                itemflow_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Itemflow v{}", itemflow_core::VERSION);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args, &config, &config_path),
    }
}
