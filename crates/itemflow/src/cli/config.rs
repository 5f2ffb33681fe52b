//! The `itemflow config` command: inspect or create the config file.
//!
//! Every subcommand works on the effective config path, which is the global
//! `--config` / `ITEMFLOW_CONFIG` value when given and the platform default
//! otherwise.

use std::path::Path;

use clap::{Args, Subcommand};
use itemflow_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the configuration the pipeline would run with
    Show,

    /// Print the config file path in use
    Path,

    /// Write a default config file to the path in use
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command against `path`.
pub fn execute(args: ConfigArgs, config: &Config, path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => println!("{}", config.to_toml()?),
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Init { force } => {
            write_default(path, force)?;
            tracing::info!("Wrote default config to {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }
    Ok(())
}

/// Write the default configuration to `path`, creating parent directories.
fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init(force: bool) -> ConfigArgs {
        ConfigArgs {
            command: ConfigCommand::Init { force },
        }
    }

    #[test]
    fn test_init_writes_to_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/itemflow.toml");

        execute(init(false), &Config::default(), &path).unwrap();

        let written = Config::load_from(&path).unwrap();
        assert_eq!(written.limits.max_file_size_mb, 100);
        assert_eq!(written.pipeline.max_steps, None);
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("itemflow.toml");
        std::fs::write(&path, "[pipeline]\nmax_steps = 4\n").unwrap();

        assert!(execute(init(false), &Config::default(), &path).is_err());
        assert_eq!(Config::load_from(&path).unwrap().pipeline.max_steps, Some(4));

        execute(init(true), &Config::default(), &path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().pipeline.max_steps, None);
    }
}
