//! The `itemflow run` command: execute one pipeline and print its report.

use clap::Args;
use itemflow_core::{standard_actions, Config, Location, Pipeline};

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Location to load (file://, bundle://)
    #[arg(default_value = "file://test.json")]
    pub location: String,

    /// Maximum number of applied actions (overrides pipeline.max_steps)
    #[arg(long, env = "ITEMFLOW_MAX_STEPS")]
    pub max_steps: Option<usize>,

    /// Print the report on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Build the pipeline for a run: configured loader plus the standard actions.
pub fn build_pipeline(args: &RunArgs, config: &Config) -> Pipeline {
    let location = Location::parse(args.location.as_str());
    if location.scheme() == itemflow_core::Scheme::Unknown {
        tracing::warn!("Location '{}' has no recognized scheme", location);
    }

    let mut pipeline = Pipeline::from_config(location, config);
    if args.max_steps.is_some() {
        pipeline = pipeline.with_max_steps(args.max_steps);
    }
    for action in standard_actions(config) {
        pipeline.add_action(action);
    }
    pipeline
}

/// Execute the run command.
pub fn execute(args: RunArgs, config: &Config) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(&args, config);
    let report = pipeline.run()?;

    tracing::info!(
        "{} reached '{}' after {} steps",
        report.location,
        report.item.classifier(),
        report.steps.len()
    );

    let summary = report.summary();
    let output = if args.compact {
        serde_json::to_string(&summary)?
    } else {
        serde_json::to_string_pretty(&summary)?
    };
    println!("{output}");
    Ok(())
}
